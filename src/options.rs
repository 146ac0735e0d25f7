/*!
Modifier strings and option flags.

Each operation takes a short modifier string in the Perl tradition (`"ig"`,
`"mS"`, ...). A modifier character either maps onto PCRE2 option bits or
onto an option interpreted by this crate; one character may set bits in
both sets. Parsing is a pure function from the modifier string to a fresh
pair of flag sets; nothing accumulates across calls, so parsing the same
string twice always yields the same flags.
*/

use crate::error::Error;
use crate::ffi;

// Option bits interpreted by this crate rather than by PCRE2.

/// Find every match instead of only the first.
pub(crate) const FIND_ALL: u32 = 1 << 0;
/// JIT-compile the pattern after a successful compile.
pub(crate) const JIT_COMPILE: u32 = 1 << 1;

/// The two disjoint flag sets a modifier string resolves to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Flags {
    /// Bits handed to the engine.
    pub(crate) engine: u32,
    /// Bits interpreted by this crate.
    pub(crate) local: u32,
}

/// Parses a compile-time modifier string.
pub(crate) fn compile_mods(mods: &str, strict: bool) -> Result<Flags, Error> {
    let mut flags = Flags::default();
    for c in mods.chars() {
        match c {
            'e' => flags.engine |= ffi::PCRE2_MATCH_UNSET_BACKREF,
            'i' => flags.engine |= ffi::PCRE2_CASELESS,
            // JavaScript compatibility: \u, \U and \x follow the JavaScript
            // escape rules and unset back-references match an empty string.
            'j' => flags.engine |= ffi::PCRE2_ALT_BSUX | ffi::PCRE2_MATCH_UNSET_BACKREF,
            'm' => flags.engine |= ffi::PCRE2_MULTILINE,
            'n' => flags.engine |= ffi::PCRE2_UTF | ffi::PCRE2_UCP,
            's' => flags.engine |= ffi::PCRE2_DOTALL,
            'u' => flags.engine |= ffi::PCRE2_UTF,
            'x' => flags.engine |= ffi::PCRE2_EXTENDED,
            'A' => flags.engine |= ffi::PCRE2_ANCHORED,
            'D' => flags.engine |= ffi::PCRE2_DOLLAR_ENDONLY,
            'J' => flags.engine |= ffi::PCRE2_DUPNAMES,
            'S' => flags.local |= JIT_COMPILE,
            'U' => flags.engine |= ffi::PCRE2_UNGREEDY,
            _ if strict => return Err(Error::InvalidModifier { modifier: c }),
            _ => {}
        }
    }
    Ok(flags)
}

/// Parses a match-time modifier string.
pub(crate) fn match_mods(mods: &str, strict: bool) -> Result<Flags, Error> {
    let mut flags = Flags::default();
    for c in mods.chars() {
        match c {
            'A' => flags.engine |= ffi::PCRE2_ANCHORED,
            'g' => flags.local |= FIND_ALL,
            _ if strict => return Err(Error::InvalidModifier { modifier: c }),
            _ => {}
        }
    }
    Ok(flags)
}

/// Parses a substitution-time modifier string.
pub(crate) fn substitute_mods(mods: &str, strict: bool) -> Result<Flags, Error> {
    let mut flags = Flags::default();
    for c in mods.chars() {
        match c {
            'e' => flags.engine |= ffi::PCRE2_SUBSTITUTE_UNSET_EMPTY,
            'E' => {
                flags.engine |=
                    ffi::PCRE2_SUBSTITUTE_UNKNOWN_UNSET | ffi::PCRE2_SUBSTITUTE_UNSET_EMPTY
            }
            'g' => flags.engine |= ffi::PCRE2_SUBSTITUTE_GLOBAL,
            'x' => flags.engine |= ffi::PCRE2_SUBSTITUTE_EXTENDED,
            _ if strict => return Err(Error::InvalidModifier { modifier: c }),
            _ => {}
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_sets_nothing() {
        assert_eq!(compile_mods("", true).unwrap(), Flags::default());
        assert_eq!(match_mods("", true).unwrap(), Flags::default());
        assert_eq!(substitute_mods("", true).unwrap(), Flags::default());
    }

    #[test]
    fn javascript_modifier_sets_both_escape_and_backref_bits() {
        let flags = compile_mods("j", true).unwrap();
        assert_ne!(flags.engine & ffi::PCRE2_ALT_BSUX, 0);
        assert_ne!(flags.engine & ffi::PCRE2_MATCH_UNSET_BACKREF, 0);
        assert_eq!(flags.local, 0);
    }

    #[test]
    fn unicode_shorthand_implies_utf_and_ucp() {
        let flags = compile_mods("n", true).unwrap();
        assert_eq!(flags.engine, ffi::PCRE2_UTF | ffi::PCRE2_UCP);
    }

    #[test]
    fn jit_is_a_local_flag_only() {
        let flags = compile_mods("S", true).unwrap();
        assert_eq!(flags.engine, 0);
        assert_eq!(flags.local, JIT_COMPILE);
    }

    #[test]
    fn global_is_a_local_flag_for_match_but_an_engine_flag_for_substitute() {
        assert_eq!(match_mods("g", true).unwrap().local, FIND_ALL);
        assert_eq!(
            substitute_mods("g", true).unwrap().engine,
            ffi::PCRE2_SUBSTITUTE_GLOBAL
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let once = compile_mods("imsJS", true).unwrap();
        let twice = compile_mods("imsJS", true).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn strict_reports_the_offending_character() {
        match compile_mods("iq", true) {
            Err(Error::InvalidModifier { modifier }) => assert_eq!(modifier, 'q'),
            other => panic!("expected InvalidModifier, got {:?}", other),
        }
        assert!(match_mods("z", true).is_err());
        assert!(substitute_mods("k", true).is_err());
    }

    #[test]
    fn lenient_ignores_unknown_characters() {
        let strictly = compile_mods("im", false).unwrap();
        let with_junk = compile_mods("i?m!", false).unwrap();
        assert_eq!(strictly, with_junk);
    }
}
