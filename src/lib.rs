//! Taskchain: chained slash commands for agent hosts.
//!
//! Command definitions are markdown documents whose optional YAML header
//! declares follow-up `return` items and `parallel` subtasks. This crate
//! discovers those definitions, expands parallel fan-out, inlines earlier
//! conversation turns into prompts and drives return chains across host
//! lifecycle notifications.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (filesystem, in-memory)
//! - **Services**: Orchestration over domain types and ports
//!
//! # Modules
//!
//! - [`command`]: Definition parsing, manifest building and parallel expansion
//! - [`history`]: Turn-reference resolution against session history
//! - [`session`]: Per-session orchestration of return chains
//! - [`config`]: Persisted plugin configuration
//! - [`telemetry`]: Debug log initialisation
//! - [`plugin`]: Wiring of the above behind one entry point

pub mod command;
pub mod config;
pub mod history;
pub mod plugin;
pub mod session;
pub mod telemetry;
