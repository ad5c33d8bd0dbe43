//! Conversation history and turn-reference expansion.
//!
//! Prompts may embed `$TURN[...]` placeholders that pull earlier messages
//! of the session into the text. The [`services::TurnReferenceResolver`]
//! fetches history through the session host port and renders the selected
//! messages with [`services::TranscriptRenderer`].

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
