use pcre2_wrap::{Error, Regex, RegexBuilder};

#[test]
fn single_match_numbered_groups() {
    let re = Regex::new(r"(\d{4})-(\d{2})").unwrap();
    let matches = re.captures("date: 2020-11", "").unwrap();
    assert_eq!(matches.len(), 1);
    let caps = &matches[0];
    assert_eq!(caps.get(0), Some("2020-11"));
    assert_eq!(caps.get(1), Some("2020"));
    assert_eq!(caps.get(2), Some("11"));
    assert_eq!(caps.get(3), None);
    // No keys beyond the pattern's group count.
    assert!(caps.iter().all(|(number, _)| number <= 2));
}

#[test]
fn no_match_is_a_zero_count_outcome() {
    let re = Regex::new(r"\d").unwrap();
    assert_eq!(re.captures("no digits here", "g").unwrap().len(), 0);
    assert!(!re.is_match("no digits here").unwrap());
    assert!(re.find("no digits here").unwrap().is_none());
}

#[test]
fn global_match_scans_left_to_right() {
    let re = Regex::new("[0-9]").unwrap();
    let matches = re.captures("a1b2c3", "g").unwrap();
    let digits: Vec<&str> = matches.iter().flat_map(|c| c.get(0)).collect();
    assert_eq!(digits, ["1", "2", "3"]);
}

#[test]
fn without_global_only_the_first_match_is_returned() {
    let re = Regex::new("[0-9]").unwrap();
    let matches = re.captures("a1b2c3", "").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].get(0), Some("1"));
}

#[test]
fn find_returns_the_first_match() {
    let re = Regex::new(r"[a-z]+").unwrap();
    let caps = re.find("12 abc de").unwrap().unwrap();
    assert_eq!(caps.get(0), Some("abc"));
}

#[test]
fn empty_matches_advance_by_whole_code_points_in_utf_mode() {
    // "x*" matches the empty string at every position. Over a subject of
    // three code points (five bytes) that is one empty match per code
    // point boundary: four in total, never splitting a character.
    let re = Regex::with_modifiers("x*", "u").unwrap();
    let matches = re.captures("h\u{e9}\u{e9}", "g").unwrap();
    assert_eq!(matches.len(), 4);
    assert!(matches.iter().all(|c| c.get(0) == Some("")));
}

#[test]
fn empty_matches_advance_by_bytes_without_utf_mode() {
    let re = Regex::new("x*").unwrap();
    let matches = re.captures("h\u{e9}\u{e9}", "g").unwrap();
    // Five bytes, six boundaries.
    assert_eq!(matches.len(), 6);
}

#[test]
fn empty_and_nonempty_matches_interleave() {
    // "b*" on "abc": empty at 0, "b" at 1, empty at 2, empty at 3.
    let re = Regex::new("b*").unwrap();
    let matches = re.captures("abc", "g").unwrap();
    let texts: Vec<&str> = matches.iter().flat_map(|c| c.get(0)).collect();
    assert_eq!(texts, ["", "b", "", ""]);
}

#[test]
fn empty_match_on_empty_subject() {
    let re = Regex::new("x*").unwrap();
    let matches = re.captures("", "g").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].get(0), Some(""));
}

#[test]
fn crlf_is_skipped_as_one_position() {
    // Under ANYCRLF a multiline "$" matches before the CR LF pair and at
    // the end of the subject. After the empty match before CR LF the
    // cursor must step over both bytes; stepping one byte at a time would
    // produce a third, spurious match before the lone LF.
    let re = Regex::with_modifiers(r"(*ANYCRLF)$", "m").unwrap();
    let matches = re.captures("a\r\nb", "g").unwrap();
    assert_eq!(matches.len(), 2);
}

#[test]
fn named_groups_are_consistent_with_numbered_groups() {
    let re = Regex::new(r"(?<year>\d{4})-(?<month>\d{2})").unwrap();
    let matches = re.captures("2020-11", "").unwrap();
    let caps = &matches[0];
    assert_eq!(caps.name("year"), Some("2020"));
    assert_eq!(caps.group_number("year"), Some(1));
    assert_eq!(caps.name("month"), Some("11"));
    assert_eq!(caps.group_number("month"), Some(2));
    assert_eq!(caps.name("day"), None);
    for (name, value) in caps.iter_named() {
        let number = caps.group_number(name).unwrap();
        assert_eq!(caps.get(number), Some(value));
    }
}

#[test]
fn named_groups_hold_for_every_match_of_a_global_scan() {
    let re = Regex::new(r"(?<key>\w+)=(?<value>\w+)").unwrap();
    let matches = re.captures("a=1 b=2 c=3", "g").unwrap();
    assert_eq!(matches.len(), 3);
    for caps in &matches {
        for (name, value) in caps.iter_named() {
            let number = caps.group_number(name).unwrap();
            assert_eq!(caps.get(number), Some(value));
        }
    }
    assert_eq!(matches[1].name("key"), Some("b"));
    assert_eq!(matches[1].name("value"), Some("2"));
}

#[test]
fn duplicate_names_resolve_to_the_participating_alternative() {
    let re = Regex::with_modifiers(r"(?<n>a)|(?<n>b)", "J").unwrap();

    let matches = re.captures("b", "").unwrap();
    let caps = &matches[0];
    assert_eq!(caps.name("n"), Some("b"));
    assert_eq!(caps.group_number("n"), Some(2));
    assert_eq!(caps.get(1), None);
    assert_eq!(caps.get(2), Some("b"));

    let matches = re.captures("a", "").unwrap();
    let caps = &matches[0];
    assert_eq!(caps.name("n"), Some("a"));
    assert_eq!(caps.group_number("n"), Some(1));
}

#[test]
fn unset_groups_are_omitted_not_empty() {
    // A trailing optional group that did not participate.
    let re = Regex::new("(a)(b)?").unwrap();
    let caps = &re.captures("a", "").unwrap()[0];
    assert_eq!(caps.get(2), None);
    let keys: Vec<usize> = caps.iter().map(|(number, _)| number).collect();
    assert_eq!(keys, [0, 1]);

    // An unset group below a set one is omitted while the set one stays.
    let re = Regex::new("(a)?(b)").unwrap();
    let caps = &re.captures("b", "").unwrap()[0];
    assert_eq!(caps.get(1), None);
    assert_eq!(caps.get(2), Some("b"));
    let keys: Vec<usize> = caps.iter().map(|(number, _)| number).collect();
    assert_eq!(keys, [0, 2]);
}

#[test]
fn empty_capture_is_distinct_from_an_absent_one() {
    let re = Regex::new("(a*)(b)").unwrap();
    let caps = &re.captures("b", "").unwrap()[0];
    assert_eq!(caps.get(1), Some(""));
    assert_eq!(caps.get(2), Some("b"));
}

#[test]
fn caseless_compile_modifier() {
    let re = Regex::with_modifiers("abc", "i").unwrap();
    assert!(re.is_match("xxABCxx").unwrap());
    let re = Regex::new("abc").unwrap();
    assert!(!re.is_match("xxABCxx").unwrap());
}

#[test]
fn multiline_compile_modifier() {
    let re = Regex::with_modifiers(r"^\w+$", "m").unwrap();
    let matches = re.captures("one\ntwo", "g").unwrap();
    let lines: Vec<&str> = matches.iter().flat_map(|c| c.get(0)).collect();
    assert_eq!(lines, ["one", "two"]);
}

#[test]
fn anchored_match_modifier() {
    let re = Regex::new("b").unwrap();
    assert_eq!(re.captures("abc", "A").unwrap().len(), 0);
    assert_eq!(re.captures("abc", "").unwrap().len(), 1);
}

#[test]
fn strict_mode_rejects_unknown_compile_modifiers() {
    let err = RegexBuilder::new("a")
        .modifiers("iq")
        .strict(true)
        .build()
        .unwrap_err();
    match err {
        Error::InvalidModifier { modifier } => assert_eq!(modifier, 'q'),
        other => panic!("expected InvalidModifier, got {:?}", other),
    }
    assert_eq!(err.code(), Error::INVALID_MODIFIER);
}

#[test]
fn strict_mode_rejects_unknown_match_modifiers() {
    let re = RegexBuilder::new("a").strict(true).build().unwrap();
    assert!(matches!(
        re.captures("aaa", "z"),
        Err(Error::InvalidModifier { modifier: 'z' })
    ));
}

#[test]
fn lenient_mode_ignores_unknown_modifiers() {
    let re = Regex::with_modifiers("a", "i?").unwrap();
    assert_eq!(re.captures("A", "g?").unwrap().len(), 1);
}

#[test]
fn compile_failure_carries_code_and_offset() {
    let err = Regex::new("foo(bar").unwrap_err();
    match err {
        Error::CompileFailed { code, offset } => {
            assert!(code != 0);
            assert!(offset > 0);
        }
        other => panic!("expected CompileFailed, got {:?}", other),
    }
    assert!(!err.to_string().is_empty());
}

#[test]
fn jit_modifier_still_matches() {
    // JIT support depends on the platform; with or without it, matching
    // must behave identically and a failure only shows up as a warning.
    let re = Regex::with_modifiers(r"\d+", "S").unwrap();
    let matches = re.captures("abc 123 45", "g").unwrap();
    let texts: Vec<&str> = matches.iter().flat_map(|c| c.get(0)).collect();
    assert_eq!(texts, ["123", "45"]);
}

#[test]
fn pattern_accessors() {
    let re = Regex::new(r"(a)(?<rest>.*)").unwrap();
    assert_eq!(re.as_str(), r"(a)(?<rest>.*)");
    assert_eq!(re.capture_count(), 2);
}
