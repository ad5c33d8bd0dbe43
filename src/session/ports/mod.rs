//! Port abstractions for session orchestration.

mod host;

pub use host::{SessionHost, SessionHostError, SessionHostResult};
