//! Session orchestration for chained commands.
//!
//! Hosts report lifecycle notifications (command dispatch, subtask tool
//! calls, message rendering and turn completion) to the
//! [`services::SessionOrchestrator`], which stages return items and
//! dispatches continuations through the [`ports::SessionHost`] port.
//!
//! # Architecture
//!
//! - **Domain**: identifiers, notification payloads and [`domain::SessionState`]
//! - **Ports**: [`ports::SessionHost`] for outbound host calls
//! - **Adapters**: [`adapters::RecordingSessionHost`] for tests and embedding
//! - **Services**: [`services::SessionStore`], [`services::ContinuationQueue`]
//!   and [`services::SessionOrchestrator`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
