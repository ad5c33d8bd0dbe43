//! Command source adapters.
//!
//! - [`directory::DirectoryCommandSource`]: recursive scan of a directory of
//!   definition documents
//! - [`memory::InMemoryCommandSource`]: fixed documents for tests and
//!   embedding

pub mod directory;
pub mod memory;

pub use directory::DirectoryCommandSource;
pub use memory::InMemoryCommandSource;
