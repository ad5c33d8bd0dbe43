//! Command definitions and the subtask specifications they expand into.

use serde::{Deserialize, Serialize};

use super::{ReturnItem, return_item::split_command_line};

/// Substitution point for resolved arguments inside a template body.
pub const ARGUMENTS_TOKEN: &str = "$ARGUMENTS";

/// Agent used for parallel subtasks whose definition names none.
pub const DEFAULT_SUBTASK_AGENT: &str = "general";

/// Provider and model pair parsed from a `provider/model` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    /// Provider identifier.
    #[serde(rename = "providerID")]
    pub provider_id: String,
    /// Model identifier within the provider.
    #[serde(rename = "modelID")]
    pub model_id: String,
}

impl ModelSpec {
    /// Creates a model specification.
    #[must_use]
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            model_id: model_id.into(),
        }
    }

    /// Parses `provider/model`, splitting at the first slash.
    ///
    /// Returns `None` unless both halves are non-empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskchain::command::domain::ModelSpec;
    ///
    /// let model = ModelSpec::parse("openrouter/qwen/qwen3-coder").expect("valid model");
    /// assert_eq!(model.provider_id, "openrouter");
    /// assert_eq!(model.model_id, "qwen/qwen3-coder");
    /// assert!(ModelSpec::parse("no-provider").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (provider, model) = raw.trim().split_once('/')?;
        if provider.is_empty() || model.is_empty() {
            return None;
        }
        Some(Self::new(provider, model))
    }
}

/// One entry of a definition's `parallel` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelSpec {
    /// Target command name.
    pub command: String,
    /// Arguments written explicitly for this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ParallelSpec {
    /// Creates a parallel entry.
    #[must_use]
    pub fn new(command: impl Into<String>, arguments: Option<&str>) -> Self {
        Self {
            command: command.into(),
            arguments: arguments.map(str::to_owned),
        }
    }

    /// Parses `/command args` or a bare `command`.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if let Some(reference) = trimmed.strip_prefix('/') {
            let (command, arguments) = split_command_line(reference);
            return (!command.is_empty()).then(|| Self::new(command, arguments));
        }
        (!trimmed.is_empty()).then(|| Self::new(trimmed, None))
    }
}

/// A fully parsed command definition.
///
/// Built once per manifest refresh and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    /// Lookup name: the document's file stem.
    pub name: String,
    /// Relative document path with the extension stripped.
    pub path: String,
    /// Follow-up entries executed one per turn after the command's work.
    #[serde(default)]
    pub return_sequence: Vec<ReturnItem>,
    /// Commands dispatched alongside this one.
    #[serde(default)]
    pub parallel: Vec<ParallelSpec>,
    /// Agent override.
    #[serde(default)]
    pub agent: Option<String>,
    /// Model override.
    #[serde(default)]
    pub model: Option<ModelSpec>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Template body with the metadata header stripped.
    pub template: String,
}

impl CommandDefinition {
    /// Creates a definition with an empty metadata set.
    #[must_use]
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        let command_name = name.into();
        Self {
            path: command_name.clone(),
            name: command_name,
            return_sequence: Vec::new(),
            parallel: Vec::new(),
            agent: None,
            model: None,
            description: None,
            template: template.into(),
        }
    }

    /// Sets the path-qualified name.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Appends a return-sequence entry.
    #[must_use]
    pub fn with_return(mut self, item: ReturnItem) -> Self {
        self.return_sequence.push(item);
        self
    }

    /// Appends a parallel entry.
    #[must_use]
    pub fn with_parallel(mut self, spec: ParallelSpec) -> Self {
        self.parallel.push(spec);
        self
    }

    /// Sets the agent override.
    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Sets the model override.
    #[must_use]
    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Substitutes every `$ARGUMENTS` token in the template.
    #[must_use]
    pub fn render_prompt(&self, arguments: &str) -> String {
        self.template.replace(ARGUMENTS_TOKEN, arguments)
    }

    /// Returns the first return entry, if any.
    #[must_use]
    pub fn first_return(&self) -> Option<&ReturnItem> {
        self.return_sequence.first()
    }

    /// Returns the return entries after the first.
    #[must_use]
    pub fn subsequent_returns(&self) -> &[ReturnItem] {
        self.return_sequence.get(1..).unwrap_or_default()
    }
}

/// A subtask emitted by parallel expansion.
///
/// Appended to the host's outgoing parts as a subtask part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskSpec {
    /// Agent that runs the subtask.
    pub agent: String,
    /// Model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSpec>,
    /// Short description shown by the host.
    pub description: String,
    /// Command the subtask runs as.
    pub command: String,
    /// Prompt with arguments substituted.
    pub prompt: String,
}
