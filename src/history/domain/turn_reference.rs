//! Turn-reference placeholders.
//!
//! - `$TURN[n]` selects the last `n` messages
//! - `$TURN[:i]` or `$TURN[:i:j:k]` selects specific messages, counted
//!   1-based backwards from the newest

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Placeholder token preceding the bracketed selector.
pub const TURN_TOKEN: &str = "$TURN";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static TURN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$TURN\[([^\]]+)\]").expect("turn pattern is valid"));

/// Which messages a reference selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnSelection {
    /// The last `n` messages.
    LastN(usize),
    /// Messages at 1-based positions counted back from the newest.
    Specific(Vec<usize>),
}

/// A reference found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReference {
    /// The exact placeholder text, e.g. `$TURN[:2:5]`.
    pub matched: String,
    /// The parsed selection.
    pub selection: TurnSelection,
}

/// Returns `true` if `text` contains anything shaped like a turn reference.
#[must_use]
pub fn has_turn_references(text: &str) -> bool {
    TURN_PATTERN.is_match(text)
}

/// Extracts every well-formed turn reference in order of appearance.
///
/// Placeholders whose selector does not parse are ignored.
///
/// # Examples
///
/// ```
/// use taskchain::history::domain::{TurnSelection, extract_turn_references};
///
/// let references = extract_turn_references("see $TURN[3] and $TURN[:1:4] but not $TURN[x]");
/// assert_eq!(references.len(), 2);
/// assert_eq!(references[0].selection, TurnSelection::LastN(3));
/// assert_eq!(references[1].selection, TurnSelection::Specific(vec![1, 4]));
/// ```
#[must_use]
pub fn extract_turn_references(text: &str) -> Vec<TurnReference> {
    TURN_PATTERN
        .captures_iter(text)
        .filter_map(|captures| {
            let matched = captures.get(0)?.as_str();
            let selector = captures.get(1)?.as_str();
            parse_selection(selector).map(|selection| TurnReference {
                matched: matched.to_owned(),
                selection,
            })
        })
        .collect()
}

fn parse_selection(selector: &str) -> Option<TurnSelection> {
    if selector.starts_with(':') {
        let indices = selector
            .split(':')
            .filter(|piece| !piece.is_empty())
            .map(|piece| piece.trim().parse::<usize>().ok())
            .collect::<Option<Vec<_>>>()?;
        return (!indices.is_empty()).then_some(TurnSelection::Specific(indices));
    }
    selector.trim().parse().ok().map(TurnSelection::LastN)
}

/// Replaces each turn reference whose matched text has an entry in
/// `replacements`, in a single pass.
///
/// References without an entry are left untouched, and replacement text is
/// never rescanned.
#[must_use]
pub fn replace_turn_references(text: &str, replacements: &HashMap<String, String>) -> String {
    TURN_PATTERN
        .replace_all(text, |captures: &Captures<'_>| {
            let matched = captures.get(0).map_or("", |whole| whole.as_str());
            replacements
                .get(matched)
                .cloned()
                .unwrap_or_else(|| matched.to_owned())
        })
        .into_owned()
}
