//! Application services for conversation history.

mod resolver;
mod transcript;

pub use resolver::TurnReferenceResolver;
pub use transcript::{
    MAX_TOOL_OUTPUT_CHARS, TranscriptError, TranscriptRenderer, TranscriptResult,
};
