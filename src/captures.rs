use std::collections::BTreeMap;

use crate::error::Error;
use crate::ffi;

/// The captured substrings of a single match.
///
/// Three collections are populated per match, all owned and immutable once
/// returned:
///
/// * a numbered collection, keyed by group number with `0` holding the
///   whole match;
/// * a named collection, keyed by group name, for patterns with named
///   groups;
/// * a name-to-number collection mapping each populated name to its group
///   number.
///
/// A group that did not participate in the match is *absent* from the
/// numbered collection, which is different from a group that matched the
/// empty string and is present with an empty value.
///
/// # Example
///
/// ```
/// use pcre2_wrap::Regex;
///
/// let re = Regex::new(r"(?<key>\w+)=(?<value>\w+)")?;
/// let matches = re.captures("retries=6", "")?;
/// let caps = &matches[0];
/// assert_eq!(caps.get(0), Some("retries=6"));
/// assert_eq!(caps.name("key"), Some("retries"));
/// assert_eq!(caps.group_number("value"), Some(2));
/// # Ok::<(), pcre2_wrap::Error>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Captures {
    numbered: BTreeMap<usize, String>,
    named: BTreeMap<String, String>,
    numbers: BTreeMap<String, usize>,
}

impl Captures {
    /// The substring captured by group `number`, with `0` meaning the whole
    /// match. `None` means the group did not participate in this match.
    #[inline]
    pub fn get(&self, number: usize) -> Option<&str> {
        self.numbered.get(&number).map(|s| s.as_str())
    }

    /// The substring captured by the named group `name`.
    #[inline]
    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(|s| s.as_str())
    }

    /// The group number a populated name resolves to.
    #[inline]
    pub fn group_number(&self, name: &str) -> Option<usize> {
        self.numbers.get(name).copied()
    }

    /// Iterates over the numbered collection in increasing group order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.numbered.iter().map(|(&i, v)| (i, v.as_str()))
    }

    /// Iterates over the named collection in name order.
    pub fn iter_named(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The number of groups that participated, the whole match included.
    #[inline]
    pub fn len(&self) -> usize {
        self.numbered.len()
    }

    /// True when nothing was extracted for this match.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.numbered.is_empty()
    }
}

/// Builds a `Captures` from the engine's most recent match.
///
/// `pairs` is the offset-pair count the engine returned for the match;
/// `names` is the pattern's named-group table.
///
/// Numbered groups whose fetch fails are left out: the engine reports a
/// distinct code for "group did not participate" vs "no such group", and
/// either way there is no value to record. An out-of-memory report during
/// any fetch aborts the whole operation.
///
/// Named groups are resolved through the engine twice, once by name and
/// once by the table's group number, and recorded only when both fetches
/// produce the same value. With duplicate group names (the `J` modifier)
/// the by-name fetch returns the participating alternative, so the table
/// entry for a non-participating duplicate disagrees and is skipped, while
/// the participating entry agrees and lands in both named collections.
pub(crate) fn project(
    md: &ffi::MatchData,
    pairs: usize,
    names: &[(usize, String)],
) -> Result<Captures, Error> {
    let mut caps = Captures::default();

    for number in 0..pairs {
        match ffi::substring_by_number(md, number) {
            Ok(value) => {
                caps.numbered.insert(number, value);
            }
            Err(ffi::PCRE2_ERROR_NOMEMORY) => {
                return Err(Error::ResourceExhausted {
                    code: ffi::PCRE2_ERROR_NOMEMORY,
                })
            }
            Err(_) => {}
        }
    }

    for &(number, ref name) in names {
        let by_name = match ffi::substring_by_name(md, name) {
            Ok(value) => value,
            Err(ffi::PCRE2_ERROR_NOMEMORY) => {
                return Err(Error::ResourceExhausted {
                    code: ffi::PCRE2_ERROR_NOMEMORY,
                })
            }
            Err(_) => continue,
        };
        let by_number = match ffi::substring_by_number(md, number) {
            Ok(value) => value,
            Err(ffi::PCRE2_ERROR_NOMEMORY) => {
                return Err(Error::ResourceExhausted {
                    code: ffi::PCRE2_ERROR_NOMEMORY,
                })
            }
            Err(_) => continue,
        };
        if by_name == by_number {
            caps.named.insert(name.clone(), by_name);
            caps.numbers.insert(name.clone(), number);
        }
    }

    Ok(caps)
}
