use pcre2_wrap::{Error, Regex, RegexBuilder};

#[test]
fn replaces_the_first_match_by_default() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(re.replace("a1b22", "X", "").unwrap(), "aXb22");
}

#[test]
fn global_modifier_replaces_every_match() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(re.replace("a1b22", "X", "g").unwrap(), "aXbX");
}

#[test]
fn replacement_can_reference_groups() {
    let re = Regex::new(r"(\w+)@(\w+)").unwrap();
    assert_eq!(
        re.replace("user@host", "$2.$1", "").unwrap(),
        "host.user"
    );
    let re = Regex::new(r"(?<first>\w+) (?<second>\w+)").unwrap();
    assert_eq!(
        re.replace("hello world", "${second} ${first}", "").unwrap(),
        "world hello"
    );
}

#[test]
fn no_match_returns_the_subject_unchanged() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(re.replace("no digits", "X", "g").unwrap(), "no digits");
}

#[test]
fn empty_subject() {
    let re = Regex::new("a").unwrap();
    assert_eq!(re.replace("", "X", "g").unwrap(), "");
}

#[test]
fn output_larger_than_the_initial_capacity_triggers_one_retry() {
    let re = Regex::new("a").unwrap();
    let result = re
        .replace_with_capacity("aaaa", "xxxxxxxxxx", "g", 1)
        .unwrap();
    assert_eq!(result, "x".repeat(40));
}

#[test]
fn default_capacity_handles_growing_output() {
    // Every "a" doubles, so the output exceeds the subject plus the
    // replacement and exercises the growth path internally.
    let re = Regex::new("a").unwrap();
    assert_eq!(re.replace("aaaa", "bb", "g").unwrap(), "bbbbbbbb");
}

#[test]
fn shrinking_output_fits_the_first_buffer() {
    let re = Regex::new("aaa").unwrap();
    assert_eq!(re.replace("xaaax", "", "g").unwrap(), "xx");
}

#[test]
fn unset_group_in_replacement_fails_without_the_unset_empty_modifier() {
    let re = Regex::new("(a)|(b)").unwrap();
    match re.replace("ab", "[$1$2]", "g") {
        Err(Error::SubstituteFailed { code }) => assert!(code < 0),
        other => panic!("expected SubstituteFailed, got {:?}", other),
    }
}

#[test]
fn unset_empty_modifier_treats_unset_groups_as_empty() {
    let re = Regex::new("(a)|(b)").unwrap();
    assert_eq!(re.replace("ab", "[$1$2]", "ge").unwrap(), "[a][b]");
}

#[test]
fn unknown_unset_modifier_also_allows_unknown_groups() {
    let re = Regex::new("(a)").unwrap();
    assert!(re.replace("a", "$5", "g").is_err());
    assert_eq!(re.replace("a", "$5", "gE").unwrap(), "");
}

#[test]
fn extended_replacement_syntax() {
    let re = Regex::new(r"(\w+)").unwrap();
    assert_eq!(re.replace("hi", r"\U$1", "x").unwrap(), "HI");
}

#[test]
fn strict_mode_rejects_unknown_substitution_modifiers() {
    let re = RegexBuilder::new("a").strict(true).build().unwrap();
    assert!(matches!(
        re.replace("a", "b", "q"),
        Err(Error::InvalidModifier { modifier: 'q' })
    ));
}

#[test]
fn multibyte_subject_and_replacement() {
    let re = Regex::with_modifiers(r"\d+", "u").unwrap();
    assert_eq!(
        re.replace("caf\u{e9} 24", "n\u{b0}$0", "").unwrap(),
        "caf\u{e9} n\u{b0}24"
    );
}
