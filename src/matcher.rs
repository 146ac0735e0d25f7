/*!
The repeated-match loop.

Finding every match in a subject is trickier than calling the engine in a
loop because of zero-width matches. Restarting at the end of an empty match
would loop forever, so after an empty match the engine is re-run at the
same offset with `NOTEMPTY_ATSTART | ANCHORED` to look for a non-empty
alternative there. If that fails too, the cursor is advanced by exactly one
position: one code unit, two when it sits on a CR LF pair and the pattern's
newline convention treats CRLF as a line terminator, and past any UTF-8
continuation bytes when the pattern runs in UTF mode, so a code point is
never split.
*/

use crate::captures::{self, Captures};
use crate::error::Error;
use crate::ffi;

/// Runs a match request: a single attempt, or a full scan when `find_all`
/// is set. Matches come back in left-to-right scan order.
pub(crate) fn run(
    code: &ffi::Code,
    subject: &[u8],
    engine_opts: u32,
    find_all: bool,
) -> Result<Vec<Captures>, Error> {
    // Pattern metadata is fixed for the life of the compiled pattern, so
    // query it once per run.
    let utf = ffi::info_u32(code, ffi::PCRE2_INFO_ALLOPTIONS) & ffi::PCRE2_UTF != 0;
    let newline = ffi::info_u32(code, ffi::PCRE2_INFO_NEWLINE);
    let crlf_is_newline = matches!(
        newline,
        ffi::PCRE2_NEWLINE_ANY | ffi::PCRE2_NEWLINE_CRLF | ffi::PCRE2_NEWLINE_ANYCRLF
    );
    let names = ffi::name_table(code);

    let mut md = ffi::MatchData::new(code).map_err(|code| Error::ResourceExhausted { code })?;
    let mut results = Vec::new();

    let pairs = match ffi::match_once(code, subject, 0, engine_opts, &mut md) {
        ffi::MatchOutcome::NoMatch => return Ok(results),
        ffi::MatchOutcome::Fail(code) => {
            return Err(Error::MatchFailed {
                code,
                partial: results,
            })
        }
        ffi::MatchOutcome::Match(pairs) => pairs,
    };
    if pairs == 0 {
        // The engine's result vector was too small for the capture groups.
        // Sizing the match data from the pattern rules this out, but the
        // engine contract allows it: the match counts, nothing is extracted
        // and the scan stops.
        results.push(Captures::default());
        return Ok(results);
    }
    results.push(captures::project(&md, pairs, &names)?);
    if !find_all {
        return Ok(results);
    }

    let (first_start, first_end) = md.whole_match();
    let mut start = first_end;
    let mut prev_empty = first_start == first_end;

    loop {
        let mut options = engine_opts;
        if prev_empty {
            // The previous match was empty. At the end of the subject the
            // scan is complete; anywhere else, look for a non-empty match
            // at the same offset before giving up on it.
            if start == subject.len() {
                break;
            }
            options |= ffi::PCRE2_NOTEMPTY_ATSTART | ffi::PCRE2_ANCHORED;
        }

        match ffi::match_once(code, subject, start, options, &mut md) {
            ffi::MatchOutcome::NoMatch => {
                if !prev_empty {
                    // No retry flags were in effect, so the subject really
                    // is exhausted.
                    break;
                }
                // The non-empty retry found nothing; this is not a real
                // mismatch. Step to the next position and go around again.
                start = advance_one(subject, start, crlf_is_newline, utf);
                prev_empty = false;
            }
            ffi::MatchOutcome::Fail(code) => {
                return Err(Error::MatchFailed {
                    code,
                    partial: results,
                })
            }
            ffi::MatchOutcome::Match(pairs) => {
                if pairs == 0 {
                    results.push(Captures::default());
                    break;
                }
                results.push(captures::project(&md, pairs, &names)?);
                let (match_start, match_end) = md.whole_match();
                log::trace!(
                    "match {} at {}..{}",
                    results.len(),
                    match_start,
                    match_end
                );
                prev_empty = match_start == match_end;
                start = match_end;
            }
        }
    }
    Ok(results)
}

/// Advances the scan cursor by one subject position: one code unit, two
/// over a CR LF pair under a CRLF-recognizing newline convention, and past
/// trailing UTF-8 continuation bytes in UTF mode.
fn advance_one(subject: &[u8], start: usize, crlf_is_newline: bool, utf: bool) -> usize {
    let mut next = start + 1;
    if crlf_is_newline && next < subject.len() && subject[start] == b'\r' && subject[next] == b'\n'
    {
        next += 1;
    } else if utf {
        while next < subject.len() && subject[next] & 0xc0 == 0x80 {
            next += 1;
        }
    }
    next
}
