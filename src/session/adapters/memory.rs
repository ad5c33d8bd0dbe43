//! In-memory session host for tests and embedding.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::history::domain::Message;
use crate::session::{
    domain::SessionId,
    ports::{SessionHost, SessionHostError, SessionHostResult},
};

/// An outbound call observed by [`RecordingSessionHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `send_async_message` was invoked.
    Message {
        /// Target session.
        session_id: SessionId,
        /// Message text.
        text: String,
    },
    /// `dispatch_command` was invoked.
    Command {
        /// Target session.
        session_id: SessionId,
        /// Command name.
        command: String,
        /// Command arguments.
        arguments: String,
    },
}

/// Session host that serves scripted histories and records outbound calls.
///
/// Sessions can be marked as failing, in which case every call against them
/// returns [`SessionHostError::SessionNotFound`]. Failed calls are not
/// recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingSessionHost {
    state: Arc<RwLock<RecordingHostState>>,
}

#[derive(Debug, Default)]
struct RecordingHostState {
    histories: HashMap<SessionId, Vec<Message>>,
    failing: HashSet<SessionId>,
    calls: Vec<HostCall>,
}

impl RecordingSessionHost {
    /// Creates a host with no sessions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the history served for `session_id`.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn set_history(
        &self,
        session_id: SessionId,
        messages: Vec<Message>,
    ) -> SessionHostResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| SessionHostError::runtime(std::io::Error::other(err.to_string())))?;
        state.histories.insert(session_id, messages);
        Ok(())
    }

    /// Makes every call against `session_id` fail.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn fail_session(&self, session_id: SessionId) -> SessionHostResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| SessionHostError::runtime(std::io::Error::other(err.to_string())))?;
        state.failing.insert(session_id);
        Ok(())
    }

    /// Returns the recorded calls in order.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn calls(&self) -> SessionHostResult<Vec<HostCall>> {
        let state = self
            .state
            .read()
            .map_err(|err| SessionHostError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(state.calls.clone())
    }

    fn record(&self, session_id: &SessionId, call: HostCall) -> SessionHostResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| SessionHostError::runtime(std::io::Error::other(err.to_string())))?;
        if state.failing.contains(session_id) {
            return Err(SessionHostError::SessionNotFound(session_id.clone()));
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl SessionHost for RecordingSessionHost {
    async fn send_async_message(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> SessionHostResult<()> {
        self.record(
            session_id,
            HostCall::Message {
                session_id: session_id.clone(),
                text: text.to_owned(),
            },
        )
    }

    async fn dispatch_command(
        &self,
        session_id: &SessionId,
        command: &str,
        arguments: &str,
    ) -> SessionHostResult<()> {
        self.record(
            session_id,
            HostCall::Command {
                session_id: session_id.clone(),
                command: command.to_owned(),
                arguments: arguments.to_owned(),
            },
        )
    }

    async fn fetch_message_history(
        &self,
        session_id: &SessionId,
    ) -> SessionHostResult<Vec<Message>> {
        let state = self
            .state
            .read()
            .map_err(|err| SessionHostError::runtime(std::io::Error::other(err.to_string())))?;
        if state.failing.contains(session_id) {
            return Err(SessionHostError::SessionNotFound(session_id.clone()));
        }
        Ok(state.histories.get(session_id).cloned().unwrap_or_default())
    }
}
