//! Conversation messages as reported by the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human user, or a prompt injected on their behalf.
    User,
    /// The assistant.
    Assistant,
    /// System-level content.
    System,
}

impl Role {
    /// Returns the lowercase role tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution state of a tool part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    /// Queued but not started.
    Pending,
    /// Currently executing.
    Running,
    /// Finished with output.
    Completed,
    /// Finished with an error.
    Error,
}

/// One segment of a message.
///
/// Part types the host reports but this crate does not render decode to
/// [`MessagePart::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    /// Plain text.
    Text {
        /// Text content.
        text: String,
    },
    /// A tool invocation and, once finished, its output.
    Tool {
        /// Tool name.
        tool: String,
        /// Execution state.
        status: ToolStatus,
        /// Output text for completed invocations.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output: Option<String>,
    },
    /// Any other part (step markers, reasoning, files, ...).
    #[serde(other)]
    Other,
}

impl MessagePart {
    /// Creates a text part.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates a completed tool part.
    #[must_use]
    pub fn completed_tool(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            status: ToolStatus::Completed,
            output: Some(output.into()),
        }
    }

    /// Returns `true` if the part has content worth rendering.
    #[must_use]
    pub fn is_renderable(&self) -> bool {
        match self {
            Self::Text { text } => !text.trim().is_empty(),
            Self::Tool {
                status: ToolStatus::Completed,
                output: Some(output),
                ..
            } => !output.trim().is_empty(),
            Self::Tool { .. } | Self::Other => false,
        }
    }
}

/// A message with its role and ordered parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub role: Role,
    /// Ordered content parts.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// Creates a message with no parts.
    #[must_use]
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            parts: Vec::new(),
        }
    }

    /// Creates a message holding a single text part.
    #[must_use]
    pub fn with_text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role).with_part(MessagePart::text(text))
    }

    /// Appends a part.
    #[must_use]
    pub fn with_part(mut self, part: MessagePart) -> Self {
        self.parts.push(part);
        self
    }

    /// Returns `true` if any part has renderable content.
    #[must_use]
    pub fn has_renderable_content(&self) -> bool {
        self.parts.iter().any(MessagePart::is_renderable)
    }
}
