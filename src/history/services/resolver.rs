//! Expansion of turn references into transcripts of prior messages.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::TranscriptRenderer;
use crate::history::domain::{
    Message, TURN_TOKEN, TurnSelection, extract_turn_references, replace_turn_references,
};
use crate::session::domain::SessionId;
use crate::session::ports::SessionHost;

/// Replaces turn references in prompt text with rendered history.
///
/// History is fetched once per [`TurnReferenceResolver::resolve`] call. A
/// failed fetch or render never surfaces as an error: each reference is
/// replaced by an inline `[$TURN unavailable: ...]` marker instead.
pub struct TurnReferenceResolver<H>
where
    H: SessionHost,
{
    host: Arc<H>,
}

impl<H> Clone for TurnReferenceResolver<H>
where
    H: SessionHost,
{
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<H> TurnReferenceResolver<H>
where
    H: SessionHost,
{
    /// Creates a resolver reading history from `host`.
    #[must_use]
    pub const fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// Resolves every turn reference in `text` against `session_id`.
    ///
    /// `cached_return` replaces the host's generic placeholder wherever it
    /// appears in the selected messages.
    pub async fn resolve(
        &self,
        text: &str,
        session_id: &SessionId,
        cached_return: Option<&str>,
    ) -> String {
        let references = extract_turn_references(text);
        if references.is_empty() {
            return text.to_owned();
        }

        let history = match self.host.fetch_message_history(session_id).await {
            Ok(history) => history,
            Err(error) => {
                warn!(%session_id, %error, "failed to fetch history for turn references");
                let marker = unavailable_marker(&error.to_string());
                let replacements = references
                    .into_iter()
                    .map(|reference| (reference.matched, marker.clone()))
                    .collect();
                return replace_turn_references(text, &replacements);
            }
        };

        let messages = trim_trailing_empty(&history);
        let renderer = TranscriptRenderer::new().with_cached_return(cached_return);
        let mut replacements = HashMap::new();
        for reference in references {
            if replacements.contains_key(&reference.matched) {
                continue;
            }
            let selected = select(messages, &reference.selection);
            let rendered = renderer.render(selected).unwrap_or_else(|error| {
                warn!(%session_id, %error, reference = %reference.matched, "failed to render turn reference");
                unavailable_marker(&error.to_string())
            });
            debug!(%session_id, reference = %reference.matched, "resolved turn reference");
            replacements.insert(reference.matched, rendered);
        }
        replace_turn_references(text, &replacements)
    }
}

fn unavailable_marker(reason: &str) -> String {
    format!("[{TURN_TOKEN} unavailable: {reason}]")
}

fn trim_trailing_empty(history: &[Message]) -> &[Message] {
    let end = history
        .iter()
        .rposition(Message::has_renderable_content)
        .map_or(0, |index| index + 1);
    history.get(..end).unwrap_or_default()
}

fn select<'m>(messages: &'m [Message], selection: &TurnSelection) -> Vec<&'m Message> {
    let len = messages.len();
    match selection {
        TurnSelection::LastN(count) => messages
            .iter()
            .skip(len.saturating_sub(*count))
            .collect(),
        TurnSelection::Specific(positions) => positions
            .iter()
            .filter(|position| **position > 0)
            .filter_map(|position| len.checked_sub(*position))
            .filter_map(|index| messages.get(index))
            .collect(),
    }
}
