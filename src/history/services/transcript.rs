//! Rendering of selected messages into a role-tagged transcript.

use std::sync::LazyLock;

use minijinja::{Environment, context};
use regex::Regex;
use thiserror::Error;

use crate::history::domain::{Message, MessagePart, ToolStatus};
use crate::session::domain::{HOST_GENERIC_PROMPT, SUBTASK_TOOL_NAME};

/// Rendered tool blocks at or above this many characters are dropped.
pub const MAX_TOOL_OUTPUT_CHARS: usize = 10_000;

const MESSAGE_TEMPLATE: &str = "<{{ role }}>\n{{ content }}\n</{{ role }}>";
const TOOL_TEMPLATE: &str = "<tool name=\"{{ tool }}\">\n{{ output }}\n</tool>";
const SECTION_SEPARATOR: &str = "\n\n";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static TASK_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<task_metadata>.*?</task_metadata>").expect("metadata pattern is valid")
});

/// Result type for transcript rendering.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Errors raised while rendering a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscriptError {
    /// A block template failed to render.
    #[error("failed to render transcript block: {reason}")]
    Render {
        /// Renderer diagnostic.
        reason: String,
    },
}

/// Renders messages as `<role>...</role>` blocks separated by blank lines.
///
/// Text parts are copied verbatim. A text part holding the host's generic
/// placeholder is swapped for the cached return prompt, or omitted when
/// there is none. Delegated-subtask output is unwrapped and inlined, while
/// other completed tool output is wrapped in a `<tool>` block when it fits
/// under the size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptRenderer<'a> {
    cached_return: Option<&'a str>,
    max_tool_output: usize,
}

impl Default for TranscriptRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TranscriptRenderer<'a> {
    /// Creates a renderer with no cached return.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cached_return: None,
            max_tool_output: MAX_TOOL_OUTPUT_CHARS,
        }
    }

    /// Sets the text substituted for the host's generic placeholder.
    #[must_use]
    pub const fn with_cached_return(mut self, cached_return: Option<&'a str>) -> Self {
        self.cached_return = cached_return;
        self
    }

    /// Overrides the tool output ceiling.
    #[must_use]
    pub const fn with_max_tool_output(mut self, max_tool_output: usize) -> Self {
        self.max_tool_output = max_tool_output;
        self
    }

    /// Renders `messages` in the order given.
    ///
    /// Messages with nothing to show are skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::Render`] when a block template fails.
    pub fn render<'m>(
        &self,
        messages: impl IntoIterator<Item = &'m Message>,
    ) -> TranscriptResult<String> {
        let environment = Environment::new();
        let mut blocks = Vec::new();
        for message in messages {
            let sections = self.sections(&environment, message)?;
            if sections.is_empty() {
                continue;
            }
            let block = environment
                .render_str(
                    MESSAGE_TEMPLATE,
                    context! {
                        role => message.role.as_str(),
                        content => sections.join(SECTION_SEPARATOR),
                    },
                )
                .map_err(|error| TranscriptError::Render {
                    reason: error.to_string(),
                })?;
            blocks.push(block);
        }
        Ok(blocks.join(SECTION_SEPARATOR))
    }

    fn sections(
        &self,
        environment: &Environment<'_>,
        message: &Message,
    ) -> TranscriptResult<Vec<String>> {
        let mut sections = Vec::new();
        for part in &message.parts {
            match part {
                MessagePart::Text { text } => {
                    if text.trim() == HOST_GENERIC_PROMPT {
                        sections.extend(self.cached_return.map(str::to_owned));
                    } else if !text.trim().is_empty() {
                        sections.push(text.clone());
                    }
                }
                MessagePart::Tool {
                    tool,
                    status: ToolStatus::Completed,
                    output: Some(output),
                } => {
                    if tool == SUBTASK_TOOL_NAME {
                        let unwrapped = TASK_METADATA.replace_all(output, "");
                        let trimmed = unwrapped.trim();
                        if !trimmed.is_empty() {
                            sections.push(trimmed.to_owned());
                        }
                    } else if !output.trim().is_empty() {
                        sections.extend(self.tool_block(environment, tool, output)?);
                    }
                }
                MessagePart::Tool { .. } | MessagePart::Other => {}
            }
        }
        Ok(sections)
    }

    fn tool_block(
        &self,
        environment: &Environment<'_>,
        tool: &str,
        output: &str,
    ) -> TranscriptResult<Option<String>> {
        let block = environment
            .render_str(TOOL_TEMPLATE, context! { tool => tool, output => output })
            .map_err(|error| TranscriptError::Render {
                reason: error.to_string(),
            })?;
        Ok((block.chars().count() < self.max_tool_output).then_some(block))
    }
}
