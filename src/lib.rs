/*!
A high-level wrapper around the PCRE2 matching engine.

This crate leaves pattern compilation, the regex syntax and the matching
machinery entirely to PCRE2 (linked in through `pcre2-sys`) and provides
the orchestration on top:

* **Modifier strings** in the Perl tradition configure compilation and
  each operation: `Regex::with_modifiers(r"\w+", "i")`, `re.captures(hay,
  "g")`, `re.replace(hay, "$1", "ge")`. Validation is lenient by default
  and strict on request.
* **Global matching** drives the engine repeatedly and deals with the
  awkward part: after a zero-width match the scan retries the same offset
  for a non-empty alternative, then advances by exactly one position,
  skipping a whole CR LF pair or a whole UTF-8 code point where the
  pattern calls for it.
* **Capture maps**: every match is returned as a [`Captures`] value with a
  numbered collection, a named collection and a name-to-number collection,
  with "group did not participate" kept distinct from "group matched the
  empty string".
* **Substitution** uses the engine's buffer-too-small reporting to grow
  the output buffer at most once, then fails fast.

Recoverable engine warnings (a failed JIT optimization) are demoted to
[`log`](https://docs.rs/log) output and recorded on the [`Regex`], unless
the caller opts into treating warnings as fatal.

# Example: iterating over matches

```
use pcre2_wrap::Regex;

let re = Regex::new(r"(?<word>\w+)")?;
let matches = re.captures("pick three words", "g")?;
assert_eq!(matches.len(), 3);
assert_eq!(matches[2].name("word"), Some("words"));
# Ok::<(), pcre2_wrap::Error>(())
```

# Example: substitution

```
use pcre2_wrap::Regex;

let re = Regex::new(r"(\w+)@(\w+)")?;
assert_eq!(re.replace("mail user@host now", "$2.$1", "")?, "mail host.user now");
# Ok::<(), pcre2_wrap::Error>(())
```

# Subjects and encodings

Subjects are `&str` and captured text is returned as owned `String`s.
Matching without the `u` modifier works on bytes, so a capture can in
principle cut a multi-byte character in half; such captures are converted
lossily.
*/

#![warn(missing_docs, missing_debug_implementations)]

pub use crate::captures::Captures;
pub use crate::error::Error;
pub use crate::regex::{Regex, RegexBuilder};

mod captures;
mod error;
mod ffi;
mod matcher;
mod options;
mod regex;
mod replacer;
