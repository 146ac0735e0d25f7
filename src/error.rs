use crate::captures::Captures;
use crate::ffi;

/// An error reported while compiling a pattern, matching or substituting.
///
/// Engine failures carry the engine's negative code; conditions detected by
/// this crate use small positive codes ([`Error::INVALID_MODIFIER`],
/// [`Error::JIT_COMPILE_FAILED`]). "No match" is never an error: matching a
/// subject without success is a valid zero-count outcome everywhere in this
/// crate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The engine rejected the pattern. `offset` is the position in the
    /// pattern at which the error was detected.
    CompileFailed {
        /// The engine's error code.
        code: i32,
        /// Offset into the pattern string.
        offset: usize,
    },
    /// A modifier string contained an unrecognized character and strict
    /// validation was requested.
    InvalidModifier {
        /// The offending character.
        modifier: char,
    },
    /// JIT compilation was requested, failed, and the pattern was built with
    /// warnings promoted to errors. Without that promotion the same
    /// condition is a warning: it is logged, recorded on the pattern and
    /// matching falls back to the interpreter.
    JitFailed {
        /// The engine's code from the JIT compiler.
        code: i32,
    },
    /// The engine reported a fatal code while matching. Matches collected
    /// before the failure are preserved in `partial`.
    MatchFailed {
        /// The engine's error code.
        code: i32,
        /// Matches gathered before the failure, in scan order.
        partial: Vec<Captures>,
    },
    /// The engine reported a fatal code while substituting.
    SubstituteFailed {
        /// The engine's error code.
        code: i32,
    },
    /// The engine ran out of memory while a captured substring was being
    /// fetched.
    ResourceExhausted {
        /// The engine's error code.
        code: i32,
    },
}

impl Error {
    /// The code reported for an unrecognized modifier character.
    pub const INVALID_MODIFIER: i32 = 2;
    /// The code reported for a failed JIT compilation.
    pub const JIT_COMPILE_FAILED: i32 = 3;

    /// The numeric error code: the engine's own (negative) code where the
    /// engine failed, or one of this crate's positive codes.
    pub fn code(&self) -> i32 {
        match *self {
            Error::CompileFailed { code, .. } => code,
            Error::InvalidModifier { .. } => Error::INVALID_MODIFIER,
            Error::JitFailed { .. } => Error::JIT_COMPILE_FAILED,
            Error::MatchFailed { code, .. } => code,
            Error::SubstituteFailed { code } => code,
            Error::ResourceExhausted { code } => code,
        }
    }

    /// A secondary context value: the pattern offset for compile failures,
    /// the offending character for invalid modifiers, and the engine code
    /// otherwise.
    pub fn offset(&self) -> isize {
        match *self {
            Error::CompileFailed { offset, .. } => offset as isize,
            Error::InvalidModifier { modifier } => modifier as isize,
            Error::JitFailed { code } => code as isize,
            Error::MatchFailed { code, .. } => code as isize,
            Error::SubstituteFailed { code } => code as isize,
            Error::ResourceExhausted { code } => code as isize,
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Error::CompileFailed { code, offset } => {
                write!(
                    f,
                    "{} at pattern offset {}",
                    ffi::error_message(code),
                    offset
                )
            }
            Error::InvalidModifier { modifier } => {
                write!(f, "invalid modifier: '{}'", modifier)
            }
            Error::JitFailed { code } => {
                write!(f, "JIT compilation failed: {}", ffi::error_message(code))
            }
            Error::MatchFailed { code, ref partial } => {
                if partial.is_empty() {
                    write!(f, "match failed: {}", ffi::error_message(code))
                } else {
                    write!(
                        f,
                        "match failed after {} match(es): {}",
                        partial.len(),
                        ffi::error_message(code)
                    )
                }
            }
            Error::SubstituteFailed { code } => {
                write!(f, "substitution failed: {}", ffi::error_message(code))
            }
            Error::ResourceExhausted { code } => {
                write!(
                    f,
                    "out of memory while fetching a capture: {}",
                    ffi::error_message(code)
                )
            }
        }
    }
}
