//! Parsing of command-definition documents.
//!
//! A document is an optional YAML metadata header fenced by `---` lines,
//! followed by the template body:
//!
//! ```text
//! ---
//! description: Review the change
//! return:
//!   - Summarise the findings
//!   - /fix $ARGUMENTS
//! parallel: /lint, /test unit
//! ---
//! Review $ARGUMENTS carefully.
//! ```
//!
//! Parsing never fails. A header that is missing or cannot be decoded as a
//! key/value mapping yields an empty metadata set.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::{CommandDefinition, ModelSpec, ParallelSpec, ReturnItem};

const HEADER_FENCE: &str = "---";

/// A raw document split into its header text and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDocument<'a> {
    header: Option<&'a str>,
    body: &'a str,
}

impl<'a> CommandDocument<'a> {
    /// Splits raw document text into header and body.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskchain::command::domain::CommandDocument;
    ///
    /// let document = CommandDocument::split("---\nagent: build\n---\n\n  Do it.  \n");
    /// assert_eq!(document.header(), Some("agent: build"));
    /// assert_eq!(document.body(), "Do it.");
    ///
    /// let bare = CommandDocument::split("  no header here \n");
    /// assert_eq!(bare.header(), None);
    /// assert_eq!(bare.body(), "no header here");
    /// ```
    #[must_use]
    pub fn split(raw: &'a str) -> Self {
        split_header(raw).map_or_else(
            || Self {
                header: None,
                body: raw.trim(),
            },
            |(header, body)| Self {
                header: Some(header),
                body: body.trim(),
            },
        )
    }

    /// Returns the header text between the fences, if present.
    #[must_use]
    pub const fn header(&self) -> Option<&'a str> {
        self.header
    }

    /// Returns the trimmed template body.
    #[must_use]
    pub const fn body(&self) -> &'a str {
        self.body
    }

    /// Decodes the header into a key/value mapping.
    ///
    /// Missing or undecodable headers produce an empty mapping.
    #[must_use]
    pub fn metadata(&self) -> Mapping {
        let Some(header) = self.header else {
            return Mapping::new();
        };
        match serde_yaml::from_str::<Value>(header) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => {
                debug!("command header is not a key/value mapping; ignoring it");
                Mapping::new()
            }
            Err(error) => {
                debug!(%error, "command header could not be decoded; ignoring it");
                Mapping::new()
            }
        }
    }

    /// Builds a command definition from this document.
    #[must_use]
    pub fn into_definition(self, name: &str, path: &str) -> CommandDefinition {
        let metadata = self.metadata();
        let mut definition = CommandDefinition::new(name, self.body).with_path(path);
        definition.return_sequence = parse_return_sequence(metadata.get("return"));
        definition.parallel = parse_parallel(metadata.get("parallel"));
        definition.agent = string_field(&metadata, "agent");
        definition.description = string_field(&metadata, "description");
        definition.model =
            string_field(&metadata, "model").and_then(|model| ModelSpec::parse(&model));
        definition
    }
}

/// Parses a raw document into a definition registered under `name`.
#[must_use]
pub fn parse_definition(name: &str, path: &str, raw: &str) -> CommandDefinition {
    CommandDocument::split(raw).into_definition(name, path)
}

fn split_header(raw: &str) -> Option<(&str, &str)> {
    let after_open = raw
        .strip_prefix("---\r\n")
        .or_else(|| raw.strip_prefix("---\n"))?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == HEADER_FENCE {
            let header = after_open.get(..offset)?.trim_end_matches(['\r', '\n']);
            let body = after_open.get(offset + line.len()..)?;
            return Some((header, body));
        }
        offset += line.len();
    }
    None
}

fn string_field(metadata: &Mapping, key: &str) -> Option<String> {
    metadata.get(key).and_then(scalar_to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn parse_return_sequence(value: Option<&Value>) -> Vec<ReturnItem> {
    match value {
        Some(Value::Sequence(entries)) => entries
            .iter()
            .filter_map(scalar_to_string)
            .map(|entry| ReturnItem::parse(&entry))
            .collect(),
        Some(scalar) => scalar_to_string(scalar)
            .map(|entry| vec![ReturnItem::parse(&entry)])
            .unwrap_or_default(),
        None => Vec::new(),
    }
}

fn parse_parallel(value: Option<&Value>) -> Vec<ParallelSpec> {
    match value {
        Some(Value::Sequence(entries)) => entries.iter().filter_map(parse_parallel_item).collect(),
        Some(Value::String(joined)) => joined.split(',').filter_map(ParallelSpec::parse).collect(),
        Some(other) => parse_parallel_item(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn parse_parallel_item(value: &Value) -> Option<ParallelSpec> {
    match value {
        Value::String(entry) => ParallelSpec::parse(entry),
        Value::Mapping(object) => {
            let command = object.get("command").and_then(scalar_to_string)?;
            let command_name = command.trim().trim_start_matches('/');
            if command_name.is_empty() {
                return None;
            }
            let arguments = object.get("arguments").and_then(scalar_to_string);
            Some(ParallelSpec::new(command_name, arguments.as_deref()))
        }
        _ => None,
    }
}
