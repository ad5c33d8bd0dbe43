//! Tests for turn-reference parsing and replacement.

use std::collections::HashMap;

use rstest::rstest;

use crate::history::domain::{
    TurnSelection, extract_turn_references, has_turn_references, replace_turn_references,
};

#[rstest]
#[case("$TURN[5]", TurnSelection::LastN(5))]
#[case("$TURN[:2]", TurnSelection::Specific(vec![2]))]
#[case("$TURN[:2:5:8]", TurnSelection::Specific(vec![2, 5, 8]))]
#[case("$TURN[ 3 ]", TurnSelection::LastN(3))]
fn selectors_parse(#[case] text: &str, #[case] expected: TurnSelection) {
    let references = extract_turn_references(text);

    assert_eq!(references.len(), 1);
    assert_eq!(references.first().map(|r| &r.selection), Some(&expected));
    assert_eq!(references.first().map(|r| r.matched.as_str()), Some(text));
}

#[rstest]
#[case("$TURN[abc]")]
#[case("$TURN[:x]")]
#[case("$TURN[-1]")]
#[case("$TURN[:]")]
fn malformed_selectors_are_ignored(#[case] text: &str) {
    assert!(has_turn_references(text));
    assert!(extract_turn_references(text).is_empty());
}

#[rstest]
fn text_without_references_is_detected() {
    assert!(!has_turn_references("plain $TURN text with [brackets]"));
}

#[rstest]
fn replacement_is_single_pass() {
    let mut replacements = HashMap::new();
    replacements.insert("$TURN[1]".to_owned(), "quoted $TURN[2]".to_owned());
    replacements.insert("$TURN[2]".to_owned(), "second".to_owned());

    let replaced = replace_turn_references("a $TURN[1] b $TURN[2] c $TURN[9]", &replacements);

    assert_eq!(replaced, "a quoted $TURN[2] b second c $TURN[9]");
}

#[rstest]
fn every_occurrence_is_replaced() {
    let mut replacements = HashMap::new();
    replacements.insert("$TURN[:1]".to_owned(), "last".to_owned());

    let replaced = replace_turn_references("$TURN[:1] and again $TURN[:1]", &replacements);

    assert_eq!(replaced, "last and again last");
}
