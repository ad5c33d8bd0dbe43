//! Port trait definitions for command discovery.

pub mod source;

pub use source::{CommandSource, CommandSourceError, CommandSourceResult, SourceDocument};
