/*!
The seam between this crate and the PCRE2 library.

Everything unsafe lives here. The rest of the crate consumes PCRE2 through
the small set of typed wrappers below: compile, one-shot match, substring
fetch by number or name, one-shot substitute, pattern metadata queries and
error message rendering. The wrappers never interpret results beyond
classifying the return code; policy (what counts as fatal, when to retry,
how to advance) belongs to the callers.
*/

use std::os::raw::{c_int, c_void};
use std::{ptr, slice};

use pcre2_sys::{
    pcre2_code_8, pcre2_code_free_8, pcre2_compile_8, pcre2_get_error_message_8,
    pcre2_get_ovector_pointer_8, pcre2_jit_compile_8, pcre2_match_8, pcre2_match_data_8,
    pcre2_match_data_create_from_pattern_8, pcre2_match_data_free_8, pcre2_pattern_info_8,
};

// The PCRE2 constants we use, declared here so the values we depend on are
// visible in one place. Compile options:
pub(crate) const PCRE2_ALT_BSUX: u32 = 0x0000_0002;
pub(crate) const PCRE2_CASELESS: u32 = 0x0000_0008;
pub(crate) const PCRE2_DOLLAR_ENDONLY: u32 = 0x0000_0010;
pub(crate) const PCRE2_DOTALL: u32 = 0x0000_0020;
pub(crate) const PCRE2_DUPNAMES: u32 = 0x0000_0040;
pub(crate) const PCRE2_EXTENDED: u32 = 0x0000_0080;
pub(crate) const PCRE2_MATCH_UNSET_BACKREF: u32 = 0x0000_0200;
pub(crate) const PCRE2_MULTILINE: u32 = 0x0000_0400;
pub(crate) const PCRE2_UCP: u32 = 0x0002_0000;
pub(crate) const PCRE2_UNGREEDY: u32 = 0x0004_0000;
pub(crate) const PCRE2_UTF: u32 = 0x0008_0000;

// Valid both at compile time and at match time.
pub(crate) const PCRE2_ANCHORED: u32 = 0x8000_0000;

// Match options.
pub(crate) const PCRE2_NOTEMPTY_ATSTART: u32 = 0x0000_0008;

// Substitute options. These share the match option space.
pub(crate) const PCRE2_SUBSTITUTE_GLOBAL: u32 = 0x0000_0100;
pub(crate) const PCRE2_SUBSTITUTE_EXTENDED: u32 = 0x0000_0200;
pub(crate) const PCRE2_SUBSTITUTE_UNSET_EMPTY: u32 = 0x0000_0400;
pub(crate) const PCRE2_SUBSTITUTE_UNKNOWN_UNSET: u32 = 0x0000_0800;
pub(crate) const PCRE2_SUBSTITUTE_OVERFLOW_LENGTH: u32 = 0x0000_1000;

pub(crate) const PCRE2_JIT_COMPLETE: u32 = 0x0000_0001;

// Pattern metadata queries.
pub(crate) const PCRE2_INFO_ALLOPTIONS: u32 = 0;
pub(crate) const PCRE2_INFO_CAPTURECOUNT: u32 = 4;
pub(crate) const PCRE2_INFO_NAMECOUNT: u32 = 17;
pub(crate) const PCRE2_INFO_NAMEENTRYSIZE: u32 = 18;
pub(crate) const PCRE2_INFO_NAMETABLE: u32 = 19;
pub(crate) const PCRE2_INFO_NEWLINE: u32 = 20;

// Newline conventions, as reported by PCRE2_INFO_NEWLINE.
pub(crate) const PCRE2_NEWLINE_CRLF: u32 = 3;
pub(crate) const PCRE2_NEWLINE_ANY: u32 = 4;
pub(crate) const PCRE2_NEWLINE_ANYCRLF: u32 = 5;

// Error codes.
pub(crate) const PCRE2_ERROR_NOMATCH: c_int = -1;
pub(crate) const PCRE2_ERROR_NOMEMORY: c_int = -48;

// Entry points not re-exported above are bound directly from libpcre2-8;
// pcre2-sys links the library in either way.
extern "C" {
    fn pcre2_substitute_8(
        code: *const pcre2_code_8,
        subject: *const u8,
        length: usize,
        startoffset: usize,
        options: u32,
        match_data: *mut pcre2_match_data_8,
        mcontext: *mut c_void,
        replacement: *const u8,
        rlength: usize,
        outputbuffer: *mut u8,
        outlengthptr: *mut usize,
    ) -> c_int;

    fn pcre2_substring_get_bynumber_8(
        match_data: *mut pcre2_match_data_8,
        number: u32,
        bufferptr: *mut *mut u8,
        bufflen: *mut usize,
    ) -> c_int;

    fn pcre2_substring_get_byname_8(
        match_data: *mut pcre2_match_data_8,
        name: *const u8,
        bufferptr: *mut *mut u8,
        bufflen: *mut usize,
    ) -> c_int;

    fn pcre2_substring_free_8(buffer: *mut u8);
}

/// An owned handle to a compiled pattern.
///
/// The pattern is immutable once compiled (JIT compilation happens before a
/// `Code` is shared), so read-only use from multiple threads is fine.
pub(crate) struct Code {
    ptr: *mut pcre2_code_8,
}

// SAFETY: a compiled pattern is never written to after construction; PCRE2
// documents concurrent matching on a shared pattern as supported.
unsafe impl Send for Code {}
unsafe impl Sync for Code {}

impl Drop for Code {
    fn drop(&mut self) {
        unsafe { pcre2_code_free_8(self.ptr) }
    }
}

impl Code {
    /// Compiles `pattern` with the given PCRE2 option bits. On failure,
    /// returns the engine's error code and the offset into the pattern at
    /// which the error was detected.
    pub(crate) fn compile(pattern: &str, options: u32) -> Result<Code, (c_int, usize)> {
        let mut error_code: c_int = 0;
        let mut error_offset: usize = 0;
        let ptr = unsafe {
            pcre2_compile_8(
                pattern.as_ptr(),
                pattern.len(),
                options,
                &mut error_code,
                &mut error_offset,
                ptr::null_mut(),
            )
        };
        if ptr.is_null() {
            Err((error_code, error_offset))
        } else {
            Ok(Code { ptr })
        }
    }

    /// Requests JIT compilation. Returns the engine's code: zero on success,
    /// negative when JIT is unavailable or the pattern was rejected.
    pub(crate) fn jit_compile(&self) -> c_int {
        unsafe { pcre2_jit_compile_8(self.ptr, PCRE2_JIT_COMPLETE) }
    }

    fn as_ptr(&self) -> *const pcre2_code_8 {
        self.ptr
    }
}

/// An owned match-data block sized from a pattern, plus its ovector pointer.
///
/// Sizing from the pattern guarantees the ovector has room for every capture
/// group, so a successful match can never truncate the pair count.
pub(crate) struct MatchData {
    data: *mut pcre2_match_data_8,
    ovector: *const usize,
}

impl Drop for MatchData {
    fn drop(&mut self) {
        unsafe { pcre2_match_data_free_8(self.data) }
    }
}

impl MatchData {
    /// Allocates a match-data block for `code`. The only failure mode is the
    /// allocator's, reported as the engine's out-of-memory code.
    pub(crate) fn new(code: &Code) -> Result<MatchData, c_int> {
        let data =
            unsafe { pcre2_match_data_create_from_pattern_8(code.as_ptr(), ptr::null_mut()) };
        if data.is_null() {
            return Err(PCRE2_ERROR_NOMEMORY);
        }
        let ovector = unsafe { pcre2_get_ovector_pointer_8(data) };
        Ok(MatchData { data, ovector })
    }

    /// The whole-match span of the most recent successful match. Only
    /// meaningful directly after `match_once` reported a match.
    pub(crate) fn whole_match(&self) -> (usize, usize) {
        unsafe { (*self.ovector, *self.ovector.add(1)) }
    }
}

/// Outcome of one engine match attempt.
pub(crate) enum MatchOutcome {
    /// Matched; the value is the number of offset pairs the engine returned.
    /// Zero means the result vector was too small for the capture groups,
    /// which cannot happen with a `MatchData` sized from the pattern.
    Match(usize),
    NoMatch,
    Fail(c_int),
}

/// Runs one match attempt at `start`.
pub(crate) fn match_once(
    code: &Code,
    subject: &[u8],
    start: usize,
    options: u32,
    md: &mut MatchData,
) -> MatchOutcome {
    let rc = unsafe {
        pcre2_match_8(
            code.as_ptr(),
            subject.as_ptr(),
            subject.len(),
            start,
            options,
            md.data,
            ptr::null_mut(),
        )
    };
    if rc == PCRE2_ERROR_NOMATCH {
        MatchOutcome::NoMatch
    } else if rc < 0 {
        MatchOutcome::Fail(rc)
    } else {
        MatchOutcome::Match(rc as usize)
    }
}

/// Fetches the captured substring for a group number from the most recent
/// match. `Err` carries the engine's code; callers decide which codes mean
/// "did not participate" and which are fatal.
pub(crate) fn substring_by_number(md: &MatchData, number: usize) -> Result<String, c_int> {
    let mut buffer: *mut u8 = ptr::null_mut();
    let mut length: usize = 0;
    let rc = unsafe {
        pcre2_substring_get_bynumber_8(md.data, number as u32, &mut buffer, &mut length)
    };
    if rc < 0 {
        return Err(rc);
    }
    let value = {
        let bytes = unsafe { slice::from_raw_parts(buffer, length) };
        String::from_utf8_lossy(bytes).into_owned()
    };
    unsafe { pcre2_substring_free_8(buffer) };
    Ok(value)
}

/// Fetches the captured substring for a group name from the most recent
/// match. For duplicate names the engine returns the first group with that
/// name that actually participated.
pub(crate) fn substring_by_name(md: &MatchData, name: &str) -> Result<String, c_int> {
    // The engine wants a zero-terminated name.
    let mut zname = Vec::with_capacity(name.len() + 1);
    zname.extend_from_slice(name.as_bytes());
    zname.push(0);

    let mut buffer: *mut u8 = ptr::null_mut();
    let mut length: usize = 0;
    let rc = unsafe {
        pcre2_substring_get_byname_8(md.data, zname.as_ptr(), &mut buffer, &mut length)
    };
    if rc < 0 {
        return Err(rc);
    }
    let value = {
        let bytes = unsafe { slice::from_raw_parts(buffer, length) };
        String::from_utf8_lossy(bytes).into_owned()
    };
    unsafe { pcre2_substring_free_8(buffer) };
    Ok(value)
}

/// Outcome of one engine substitution attempt.
pub(crate) enum SubstituteOutcome {
    /// Substitution succeeded; the value is the number of code units written.
    Done(usize),
    /// The output buffer was too small; the value is the length the engine
    /// reports it needs (requires `PCRE2_SUBSTITUTE_OVERFLOW_LENGTH`).
    Overflow(usize),
    Fail(c_int),
}

/// Runs one substitution pass over the whole subject into `output`.
pub(crate) fn substitute(
    code: &Code,
    subject: &[u8],
    replacement: &[u8],
    options: u32,
    output: &mut [u8],
) -> SubstituteOutcome {
    let mut out_len = output.len();
    let rc = unsafe {
        pcre2_substitute_8(
            code.as_ptr(),
            subject.as_ptr(),
            subject.len(),
            0,
            options,
            ptr::null_mut(),
            ptr::null_mut(),
            replacement.as_ptr(),
            replacement.len(),
            output.as_mut_ptr(),
            &mut out_len,
        )
    };
    if rc >= 0 {
        SubstituteOutcome::Done(out_len)
    } else if rc == PCRE2_ERROR_NOMEMORY {
        SubstituteOutcome::Overflow(out_len)
    } else {
        SubstituteOutcome::Fail(rc)
    }
}

/// Reads a `u32`-valued pattern metadata field.
pub(crate) fn info_u32(code: &Code, what: u32) -> u32 {
    let mut value: u32 = 0;
    unsafe {
        pcre2_pattern_info_8(code.as_ptr(), what, &mut value as *mut u32 as *mut c_void);
    }
    value
}

/// Decodes the pattern's named-group table into `(group number, name)`
/// entries, in table order. Each entry is the group number in two big-endian
/// bytes followed by the zero-terminated name.
pub(crate) fn name_table(code: &Code) -> Vec<(usize, String)> {
    let count = info_u32(code, PCRE2_INFO_NAMECOUNT) as usize;
    if count == 0 {
        return Vec::new();
    }
    let entry_size = info_u32(code, PCRE2_INFO_NAMEENTRYSIZE) as usize;
    let mut table: *const u8 = ptr::null();
    unsafe {
        pcre2_pattern_info_8(
            code.as_ptr(),
            PCRE2_INFO_NAMETABLE,
            &mut table as *mut *const u8 as *mut c_void,
        );
    }
    if table.is_null() || entry_size < 3 {
        return Vec::new();
    }
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let entry = unsafe { slice::from_raw_parts(table.add(i * entry_size), entry_size) };
        let number = ((entry[0] as usize) << 8) | (entry[1] as usize);
        let name = &entry[2..];
        let end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
        entries.push((number, String::from_utf8_lossy(&name[..end]).into_owned()));
    }
    entries
}

/// Renders the engine's message text for an error code.
pub(crate) fn error_message(code: c_int) -> String {
    let mut buf = [0u8; 256];
    let len = unsafe { pcre2_get_error_message_8(code, buf.as_mut_ptr(), buf.len()) };
    if len < 0 {
        format!("unknown PCRE2 error code {}", code)
    } else {
        String::from_utf8_lossy(&buf[..len as usize]).into_owned()
    }
}
