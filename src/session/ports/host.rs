//! Session RPC port exposed by the host runtime.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::history::domain::Message;
use crate::session::domain::SessionId;

/// Result type for session RPC operations.
pub type SessionHostResult<T> = Result<T, SessionHostError>;

/// Outbound calls into the host's session API.
#[async_trait]
pub trait SessionHost: Send + Sync {
    /// Posts `text` as a new user message without waiting for the reply.
    async fn send_async_message(&self, session_id: &SessionId, text: &str)
    -> SessionHostResult<()>;

    /// Runs a named command in the session.
    async fn dispatch_command(
        &self,
        session_id: &SessionId,
        command: &str,
        arguments: &str,
    ) -> SessionHostResult<()>;

    /// Returns the session's messages, oldest first.
    async fn fetch_message_history(&self, session_id: &SessionId)
    -> SessionHostResult<Vec<Message>>;
}

/// Errors returned by session host adapters.
#[derive(Debug, Clone, Error)]
pub enum SessionHostError {
    /// The host does not know the session.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The host rejected a command dispatch.
    #[error("command /{command} rejected: {reason}")]
    CommandRejected {
        /// Command name.
        command: String,
        /// Reason reported by the host.
        reason: String,
    },

    /// Generic transport or runtime failure.
    #[error("session host runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionHostError {
    /// Wraps a runtime error from the host adapter.
    #[must_use]
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
