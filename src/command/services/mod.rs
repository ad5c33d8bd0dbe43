//! Application services for command definitions.

mod expander;
mod manifest;

pub use expander::{DEFAULT_MAX_DEPTH, ParallelExpander};
pub use manifest::{Manifest, ManifestBuilder};
