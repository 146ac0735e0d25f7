use crate::captures::Captures;
use crate::error::Error;
use crate::ffi;
use crate::matcher;
use crate::options;
use crate::replacer;

/// A compiled pattern, ready for matching and substitution.
///
/// A `Regex` is configured at compile time with a modifier string (`"i"`,
/// `"mS"`, ...) and then queried with the match and substitution methods,
/// which take their own per-operation modifier strings. Compilation is the
/// expensive step; a compiled `Regex` is immutable and can be used for any
/// number of operations, from multiple threads if shared behind a
/// reference.
///
/// # Compile modifiers
///
/// | Modifier | Effect |
/// |----------|--------|
/// | `e` | unset back-references match an empty string |
/// | `i` | case-insensitive matching |
/// | `j` | JavaScript-style escapes and unset back-references |
/// | `m` | `^`/`$` match at line boundaries |
/// | `n` | UTF matching with Unicode properties |
/// | `s` | `.` matches line terminators |
/// | `u` | UTF matching |
/// | `x` | extended syntax (ignore pattern whitespace) |
/// | `A` | anchor the pattern at the start |
/// | `D` | `$` matches only at the end of the subject |
/// | `J` | allow duplicate group names |
/// | `S` | JIT-compile the pattern |
/// | `U` | invert quantifier greediness |
///
/// # Example
///
/// ```
/// use pcre2_wrap::Regex;
///
/// let re = Regex::with_modifiers(r"(?<word>\w+)", "i")?;
/// let matches = re.captures("Hello world", "g")?;
/// assert_eq!(matches.len(), 2);
/// assert_eq!(matches[0].get(0), Some("Hello"));
/// assert_eq!(matches[1].name("word"), Some("world"));
/// # Ok::<(), pcre2_wrap::Error>(())
/// ```
pub struct Regex {
    pattern: String,
    code: ffi::Code,
    strict: bool,
    jit_warning: Option<String>,
}

impl core::fmt::Display for Regex {
    /// Shows the original pattern.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl core::fmt::Debug for Regex {
    /// Shows the original pattern.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl core::str::FromStr for Regex {
    type Err = Error;

    /// Compiles a pattern with no modifiers.
    fn from_str(s: &str) -> Result<Regex, Error> {
        Regex::new(s)
    }
}

impl Regex {
    /// Compiles a pattern with no modifiers.
    ///
    /// # Example
    ///
    /// ```
    /// use pcre2_wrap::Regex;
    ///
    /// assert!(Regex::new(r"\d+").is_ok());
    /// assert!(Regex::new(r"foo(bar").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        RegexBuilder::new(pattern).build()
    }

    /// Compiles a pattern with the given compile modifiers.
    ///
    /// Unrecognized modifier characters are ignored; use [`RegexBuilder`]
    /// with [`RegexBuilder::strict`] to reject them instead.
    pub fn with_modifiers(pattern: &str, modifiers: &str) -> Result<Regex, Error> {
        RegexBuilder::new(pattern).modifiers(modifiers).build()
    }

    /// The pattern string this `Regex` was compiled from.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The number of capturing groups in the pattern, the whole match not
    /// included.
    pub fn capture_count(&self) -> usize {
        ffi::info_u32(&self.code, ffi::PCRE2_INFO_CAPTURECOUNT) as usize
    }

    /// The warning recorded when JIT compilation was requested but failed.
    ///
    /// The condition is not an error (matching silently falls back to the
    /// interpreter) unless the pattern was built with
    /// [`RegexBuilder::warnings_as_errors`].
    #[inline]
    pub fn jit_warning(&self) -> Option<&str> {
        self.jit_warning.as_deref()
    }

    /// Returns true if and only if the pattern matches somewhere in the
    /// subject.
    pub fn is_match(&self, subject: &str) -> Result<bool, Error> {
        let mut md =
            ffi::MatchData::new(&self.code).map_err(|code| Error::ResourceExhausted { code })?;
        match ffi::match_once(&self.code, subject.as_bytes(), 0, 0, &mut md) {
            ffi::MatchOutcome::NoMatch => Ok(false),
            ffi::MatchOutcome::Fail(code) => Err(Error::MatchFailed {
                code,
                partial: Vec::new(),
            }),
            ffi::MatchOutcome::Match(_) => Ok(true),
        }
    }

    /// Runs the pattern once and returns the first match, if any.
    pub fn find(&self, subject: &str) -> Result<Option<Captures>, Error> {
        let results = matcher::run(&self.code, subject.as_bytes(), 0, false)?;
        Ok(results.into_iter().next())
    }

    /// Matches the pattern against `subject` and returns one [`Captures`]
    /// per match, in left-to-right order.
    ///
    /// Without the `g` modifier at most one match is returned. Finding no
    /// match is not an error: the result is an empty vector.
    ///
    /// # Match modifiers
    ///
    /// | Modifier | Effect |
    /// |----------|--------|
    /// | `A` | anchor this match attempt at the start offset |
    /// | `g` | find every match, not just the first |
    ///
    /// # Errors
    ///
    /// A fatal engine code aborts the scan with
    /// [`Error::MatchFailed`]; matches collected before the failure are in
    /// its `partial` field.
    ///
    /// # Example
    ///
    /// ```
    /// use pcre2_wrap::Regex;
    ///
    /// let re = Regex::new("[0-9]")?;
    /// let matches = re.captures("a1b2c3", "g")?;
    /// let digits: Vec<&str> = matches.iter().flat_map(|c| c.get(0)).collect();
    /// assert_eq!(digits, ["1", "2", "3"]);
    /// # Ok::<(), pcre2_wrap::Error>(())
    /// ```
    pub fn captures(&self, subject: &str, modifiers: &str) -> Result<Vec<Captures>, Error> {
        let flags = options::match_mods(modifiers, self.strict)?;
        matcher::run(
            &self.code,
            subject.as_bytes(),
            flags.engine,
            flags.local & options::FIND_ALL != 0,
        )
    }

    /// Substitutes matches of the pattern in `subject` with `replacement`
    /// and returns the produced string. The replacement may refer to
    /// capture groups as `$1` or `${name}`. A subject without a match is
    /// returned unchanged.
    ///
    /// # Substitution modifiers
    ///
    /// | Modifier | Effect |
    /// |----------|--------|
    /// | `e` | treat unset groups in the replacement as empty |
    /// | `E` | like `e`, and also allow unknown group names |
    /// | `g` | replace every match, not just the first |
    /// | `x` | extended replacement syntax (`\U`, `\l`, `${n:+a:b}`, ...) |
    ///
    /// # Example
    ///
    /// ```
    /// use pcre2_wrap::Regex;
    ///
    /// let re = Regex::new(r"(\d+)")?;
    /// assert_eq!(re.replace("order 66", "[$1]", "g")?, "order [66]");
    /// # Ok::<(), pcre2_wrap::Error>(())
    /// ```
    pub fn replace(
        &self,
        subject: &str,
        replacement: &str,
        modifiers: &str,
    ) -> Result<String, Error> {
        // Large enough for any same-length rewrite; anything bigger is
        // covered by the engine-reported-size retry.
        let capacity = subject.len() + replacement.len() + 1;
        self.replace_with_capacity(subject, replacement, modifiers, capacity)
    }

    /// Like [`Regex::replace`], with an explicit initial output capacity in
    /// code units. An output that does not fit is retried exactly once with
    /// the capacity the engine reports it needs.
    pub fn replace_with_capacity(
        &self,
        subject: &str,
        replacement: &str,
        modifiers: &str,
        capacity: usize,
    ) -> Result<String, Error> {
        let flags = options::substitute_mods(modifiers, self.strict)?;
        replacer::run(
            &self.code,
            subject.as_bytes(),
            replacement.as_bytes(),
            flags.engine,
            capacity,
        )
    }

    pub(crate) fn code(&self) -> &ffi::Code {
        &self.code
    }
}

/// A builder for configuring how a pattern is compiled.
///
/// # Example
///
/// ```
/// use pcre2_wrap::RegexBuilder;
///
/// let err = RegexBuilder::new("a")
///     .modifiers("iq")
///     .strict(true)
///     .build()
///     .unwrap_err();
/// assert_eq!(err.to_string(), "invalid modifier: 'q'");
/// ```
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    modifiers: String,
    strict: bool,
    warnings_as_errors: bool,
}

impl RegexBuilder {
    /// Creates a builder for `pattern` with no modifiers, lenient modifier
    /// validation and warnings demoted to log output.
    pub fn new(pattern: &str) -> RegexBuilder {
        RegexBuilder {
            pattern: pattern.to_string(),
            modifiers: String::new(),
            strict: false,
            warnings_as_errors: false,
        }
    }

    /// Sets the compile modifier string.
    pub fn modifiers(&mut self, modifiers: &str) -> &mut RegexBuilder {
        self.modifiers = modifiers.to_string();
        self
    }

    /// When enabled, unrecognized modifier characters, both here and in
    /// the per-operation modifier strings of the built `Regex`, are
    /// reported as [`Error::InvalidModifier`] instead of being ignored.
    pub fn strict(&mut self, yes: bool) -> &mut RegexBuilder {
        self.strict = yes;
        self
    }

    /// When enabled, recoverable engine warnings (a failed JIT
    /// compilation) fail the build instead of being logged and recorded.
    pub fn warnings_as_errors(&mut self, yes: bool) -> &mut RegexBuilder {
        self.warnings_as_errors = yes;
        self
    }

    /// Compiles the pattern.
    pub fn build(&self) -> Result<Regex, Error> {
        let flags = options::compile_mods(&self.modifiers, self.strict)?;
        let code = ffi::Code::compile(&self.pattern, flags.engine)
            .map_err(|(code, offset)| Error::CompileFailed { code, offset })?;

        let mut jit_warning = None;
        if flags.local & options::JIT_COMPILE != 0 {
            let rc = code.jit_compile();
            if rc != 0 {
                if self.warnings_as_errors {
                    return Err(Error::JitFailed { code: rc });
                }
                let message =
                    format!("JIT compilation failed: {}", ffi::error_message(rc));
                log::warn!("{}: {}", self.pattern, message);
                jit_warning = Some(message);
            }
        }

        Ok(Regex {
            pattern: self.pattern.clone(),
            code,
            strict: self.strict,
            jit_warning,
        })
    }
}
