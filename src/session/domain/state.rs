//! Per-session orchestration state.

use std::collections::VecDeque;

use crate::command::domain::ReturnItem;

/// Orchestration bookkeeping for one session.
///
/// Created on first touch of a session and mutated by each lifecycle
/// notification. At most one return item is staged at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Command whose return sequence the session is following.
    pub main_command: Option<String>,
    /// Return item waiting for the next generic placeholder.
    pub pending_return: Option<ReturnItem>,
    /// Return items after the first, drained one per completed turn.
    pub remaining_returns: VecDeque<ReturnItem>,
    /// Return items of a command that dispatched no subtask.
    pub pending_non_subtask_returns: VecDeque<ReturnItem>,
    /// Piped arguments not yet consumed.
    pub argument_pipe: VecDeque<String>,
    /// Text of the last prompt return staged for this session.
    ///
    /// The host history still holds the generic placeholder where this text
    /// was shown, so transcript rendering substitutes it back.
    pub first_return_prompt: Option<String>,
    /// Whether a delegated subtask ran since the last placeholder.
    pub subtask_active: bool,
}

impl SessionState {
    /// Stages `item` unless a return is already pending.
    ///
    /// Returns `true` when the item was staged.
    pub fn stage_return(&mut self, item: ReturnItem) -> bool {
        if self.pending_return.is_some() {
            return false;
        }
        if let ReturnItem::Prompt { text } = &item {
            self.first_return_prompt = Some(text.clone());
        }
        self.pending_return = Some(item);
        true
    }

    /// Takes the staged return and clears the active-subtask flag.
    pub const fn take_pending_return(&mut self) -> Option<ReturnItem> {
        let item = self.pending_return.take();
        if item.is_some() {
            self.subtask_active = false;
        }
        item
    }

    /// Pops the next follow-up, preferring non-subtask returns.
    pub fn next_follow_up(&mut self) -> Option<ReturnItem> {
        self.pending_non_subtask_returns
            .pop_front()
            .or_else(|| self.remaining_returns.pop_front())
    }
}
