//! Request and payload types for host lifecycle notifications.

use serde::{Deserialize, Serialize};

use super::{CallId, SessionId};
use crate::command::domain::SubtaskSpec;

/// Placeholder text the host injects after a delegated subtask finishes.
pub const HOST_GENERIC_PROMPT: &str =
    "Summarize the task tool output above and continue with your task.";

/// Name of the host tool that runs delegated subtasks.
pub const SUBTASK_TOOL_NAME: &str = "task";

/// A named command is about to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDispatch {
    /// Command name as typed by the user.
    pub command: String,
    /// Session the command runs in.
    pub session_id: SessionId,
    /// Raw invocation arguments, possibly carrying `||` segments.
    #[serde(default)]
    pub arguments: String,
}

impl CommandDispatch {
    /// Creates a dispatch notification.
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        session_id: SessionId,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            session_id,
            arguments: arguments.into(),
        }
    }
}

/// One part of the outgoing command dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputPart {
    /// Text the host sends to the model.
    Text {
        /// Text content.
        text: String,
    },
    /// A delegated subtask the host should run.
    Subtask(SubtaskSpec),
}

impl OutputPart {
    /// Creates a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns `true` for subtask parts.
    #[must_use]
    pub const fn is_subtask(&self) -> bool {
        matches!(self, Self::Subtask(_))
    }

    /// Returns the part's prompt-bearing text.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Subtask(spec) => &spec.prompt,
        }
    }

    /// Returns a mutable handle to the part's prompt-bearing text.
    pub const fn content_mut(&mut self) -> &mut String {
        match self {
            Self::Text { text } => text,
            Self::Subtask(spec) => &mut spec.prompt,
        }
    }
}

/// A host tool invocation, before or after it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Tool name.
    pub tool: String,
    /// Host call identifier.
    pub call_id: CallId,
    /// Session the call belongs to.
    pub session_id: SessionId,
}

impl ToolInvocation {
    /// Creates an invocation of the delegated-subtask tool.
    #[must_use]
    pub fn subtask(call_id: CallId, session_id: SessionId) -> Self {
        Self {
            tool: SUBTASK_TOOL_NAME.to_owned(),
            call_id,
            session_id,
        }
    }

    /// Returns `true` when the invocation targets the delegated-subtask tool.
    #[must_use]
    pub fn is_subtask(&self) -> bool {
        self.tool == SUBTASK_TOOL_NAME
    }
}

/// Mutable arguments of a delegated-subtask invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubtaskArgs {
    /// Command the subtask runs, when it was launched from one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Prompt forwarded to the subtask agent.
    #[serde(default)]
    pub prompt: String,
    /// Short description shown by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubtaskArgs {
    /// Creates arguments for a subtask running `command`.
    #[must_use]
    pub fn for_command(command: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            prompt: prompt.into(),
            description: None,
        }
    }
}

/// The host is about to render a message list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Session owning the messages, when the host reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl RenderRequest {
    /// Creates a request scoped to one session.
    #[must_use]
    pub const fn for_session(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
        }
    }
}

/// A turn has completed and follow-up work may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCompleted {
    /// Session whose turn completed.
    pub session_id: SessionId,
}
