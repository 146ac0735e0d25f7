/*!
The substitution loop.

The engine writes its result into a caller-provided buffer and reports,
via `PCRE2_SUBSTITUTE_OVERFLOW_LENGTH`, the length it actually needs when
the buffer is too small. That allows exactly one informed retry: grow the
buffer to the reported size and run the substitution again. A second
overflow, or any other failure, is fatal: the reported size is exact, so
another round could only mean the engine and this crate disagree about
the contract, and an unbounded growth loop must not happen.
*/

use crate::error::Error;
use crate::ffi;

/// How many informed retries remain. Starts `Available`, spent by the one
/// permitted reallocation.
enum RetryBudget {
    Available,
    Spent,
}

/// Runs a substitution request and materializes the produced string.
pub(crate) fn run(
    code: &ffi::Code,
    subject: &[u8],
    replacement: &[u8],
    engine_opts: u32,
    initial_capacity: usize,
) -> Result<String, Error> {
    // Overflow reporting is mandatory: without it the engine cannot tell us
    // the required length and the retry below would be blind.
    let options = engine_opts | ffi::PCRE2_SUBSTITUTE_OVERFLOW_LENGTH;

    let mut buffer = vec![0u8; initial_capacity.max(1)];
    let mut budget = RetryBudget::Available;

    loop {
        match ffi::substitute(code, subject, replacement, options, &mut buffer) {
            ffi::SubstituteOutcome::Done(written) => {
                buffer.truncate(written);
                return Ok(String::from_utf8_lossy(&buffer).into_owned());
            }
            ffi::SubstituteOutcome::Overflow(required) => match budget {
                RetryBudget::Available => {
                    budget = RetryBudget::Spent;
                    // One extra unit for the engine's trailing NUL.
                    log::debug!(
                        "substitution buffer grown from {} to {} code units",
                        buffer.len(),
                        required + 1
                    );
                    buffer = vec![0u8; required + 1];
                }
                RetryBudget::Spent => {
                    return Err(Error::SubstituteFailed {
                        code: ffi::PCRE2_ERROR_NOMEMORY,
                    })
                }
            },
            ffi::SubstituteOutcome::Fail(code) => {
                return Err(Error::SubstituteFailed { code });
            }
        }
    }
}
