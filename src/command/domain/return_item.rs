//! Return-sequence entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One follow-up entry in a command's return sequence.
///
/// Entries are classified once when the definition is parsed: a trimmed
/// entry starting with `/` names another command, anything else is sent
/// verbatim as a prompt.
///
/// # Examples
///
/// ```
/// use taskchain::command::domain::ReturnItem;
///
/// let item = ReturnItem::parse("/review  src/lib.rs");
/// assert_eq!(item, ReturnItem::command_ref("review", Some("src/lib.rs")));
/// assert_eq!(item.to_string(), "/review src/lib.rs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReturnItem {
    /// A literal prompt sent as a new message.
    Prompt {
        /// Prompt text.
        text: String,
    },
    /// A reference to another command, dispatched through the host.
    CommandRef {
        /// Command name without the leading slash.
        name: String,
        /// Inline arguments written after the command name.
        arguments: Option<String>,
    },
}

impl ReturnItem {
    /// Classifies a raw return entry.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.strip_prefix('/') {
            Some(reference) if !reference.trim().is_empty() => {
                let (name, arguments) = split_command_line(reference);
                Self::CommandRef {
                    name: name.to_owned(),
                    arguments: arguments.map(str::to_owned),
                }
            }
            _ => Self::Prompt {
                text: trimmed.to_owned(),
            },
        }
    }

    /// Creates a prompt entry.
    #[must_use]
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::Prompt { text: text.into() }
    }

    /// Creates a command reference entry.
    #[must_use]
    pub fn command_ref(name: impl Into<String>, arguments: Option<&str>) -> Self {
        Self::CommandRef {
            name: name.into(),
            arguments: arguments.map(str::to_owned),
        }
    }

    /// Returns `true` for command references.
    #[must_use]
    pub const fn is_command_ref(&self) -> bool {
        matches!(self, Self::CommandRef { .. })
    }
}

impl fmt::Display for ReturnItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prompt { text } => f.write_str(text),
            Self::CommandRef {
                name,
                arguments: Some(arguments),
            } => write!(f, "/{name} {arguments}"),
            Self::CommandRef {
                name,
                arguments: None,
            } => write!(f, "/{name}"),
        }
    }
}

/// Splits `name rest of line` at the first whitespace run.
///
/// The remainder is trimmed and reported as `None` when empty.
pub(crate) fn split_command_line(line: &str) -> (&str, Option<&str>) {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let remainder = rest.trim();
            (name, (!remainder.is_empty()).then_some(remainder))
        }
        None => (trimmed, None),
    }
}
