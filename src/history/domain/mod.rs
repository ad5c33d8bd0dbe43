//! Domain types for conversation history and turn references.

mod message;
mod turn_reference;

pub use message::{Message, MessagePart, Role, ToolStatus};
pub use turn_reference::{
    TURN_TOKEN, TurnReference, TurnSelection, extract_turn_references, has_turn_references,
    replace_turn_references,
};
