//! Command definitions, discovery and parallel expansion.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::CommandDefinition`], [`domain::ReturnItem`] and the
//!   document parser
//! - **Ports**: [`ports::CommandSource`] enumerates raw documents
//! - **Adapters**: [`adapters::DirectoryCommandSource`] and
//!   [`adapters::InMemoryCommandSource`]
//! - **Services**: [`services::ManifestBuilder`] and
//!   [`services::ParallelExpander`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
