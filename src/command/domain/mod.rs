//! Domain types for command definitions.
//!
//! Definitions are immutable after construction and serialisable via serde.

mod definition;
mod document;
mod return_item;

pub use definition::{
    ARGUMENTS_TOKEN, CommandDefinition, DEFAULT_SUBTASK_AGENT, ModelSpec, ParallelSpec,
    SubtaskSpec,
};
pub use document::{CommandDocument, parse_definition};
pub use return_item::ReturnItem;
