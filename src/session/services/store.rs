//! Keyed orchestration state shared by every lifecycle notification.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::command::domain::ReturnItem;
use crate::session::domain::{CallId, SessionId, SessionState};

/// Owner of all per-session, per-call and deduplication state.
///
/// Every accessor takes the lock for the duration of a synchronous closure
/// or lookup, so no guard ever lives across an `.await`.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: Mutex<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    sessions: BTreeMap<SessionId, SessionState>,
    calls: HashMap<CallId, String>,
    executed: HashSet<(SessionId, ReturnItem)>,
    pending_parent: Option<SessionId>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `update` against the session's state, creating it on first
    /// touch.
    pub fn with_session<R>(
        &self,
        session_id: &SessionId,
        update: impl FnOnce(&mut SessionState) -> R,
    ) -> R {
        let mut state = self.lock();
        let session = state.sessions.entry(session_id.clone()).or_default();
        update(session)
    }

    /// Returns a copy of the session's state, if it has been touched.
    #[must_use]
    pub fn snapshot(&self, session_id: &SessionId) -> Option<SessionState> {
        self.lock().sessions.get(session_id).cloned()
    }

    /// Returns the cached prompt return for the session.
    #[must_use]
    pub fn cached_return(&self, session_id: &SessionId) -> Option<String> {
        self.lock()
            .sessions
            .get(session_id)
            .and_then(|session| session.first_return_prompt.clone())
    }

    /// Remembers which command a subtask call runs.
    pub fn record_call(&self, call_id: CallId, command: String) {
        self.lock().calls.insert(call_id, command);
    }

    /// Removes and returns the command recorded for a call.
    #[must_use]
    pub fn take_call(&self, call_id: &CallId) -> Option<String> {
        self.lock().calls.remove(call_id)
    }

    /// Records that `item` was dispatched for the session.
    ///
    /// Returns `false` when the pair was already recorded.
    #[must_use]
    pub fn mark_executed(&self, session_id: &SessionId, item: &ReturnItem) -> bool {
        self.lock()
            .executed
            .insert((session_id.clone(), item.clone()))
    }

    /// Marks `session_id` as the parent of the next subtask invocation.
    pub fn set_pending_parent(&self, session_id: SessionId) {
        self.lock().pending_parent = Some(session_id);
    }

    /// Takes the pending parent session, clearing the slot.
    #[must_use]
    pub fn take_pending_parent(&self) -> Option<SessionId> {
        self.lock().pending_parent.take()
    }

    /// Takes the first staged return, clearing that session's active
    /// subtask flag.
    ///
    /// When `scope` is given only that session is considered; otherwise
    /// sessions are examined in identifier order.
    #[must_use]
    pub fn claim_pending_return(
        &self,
        scope: Option<&SessionId>,
    ) -> Option<(SessionId, ReturnItem)> {
        let mut state = self.lock();
        state
            .sessions
            .iter_mut()
            .filter(|(id, _)| scope.is_none_or(|wanted| *id == wanted))
            .find_map(|(id, session)| {
                session
                    .take_pending_return()
                    .map(|item| (id.clone(), item))
            })
    }

    /// Clears the first active subtask flag, returning its session.
    ///
    /// Scoping follows [`SessionStore::claim_pending_return`].
    #[must_use]
    pub fn claim_active_subtask(&self, scope: Option<&SessionId>) -> Option<SessionId> {
        let mut state = self.lock();
        state
            .sessions
            .iter_mut()
            .filter(|(id, _)| scope.is_none_or(|wanted| *id == wanted))
            .find(|(_, session)| session.subtask_active)
            .map(|(id, session)| {
                session.subtask_active = false;
                id.clone()
            })
    }
}
