//! Adapter implementations for the session host port.

pub mod memory;

pub use memory::{HostCall, RecordingSessionHost};
