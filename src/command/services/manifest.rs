//! Manifest construction from precedence-ordered sources.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command::domain::{CommandDefinition, parse_definition};
use crate::command::ports::CommandSource;

/// Name-keyed table of command definitions.
///
/// Definitions are reachable by their bare name and by their path-qualified
/// name, so same-named commands in different subfolders stay addressable.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    by_name: HashMap<String, Arc<CommandDefinition>>,
    by_path: HashMap<String, Arc<CommandDefinition>>,
}

impl Manifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manifest from already-built definitions.
    ///
    /// Later definitions overwrite earlier ones with the same name.
    #[must_use]
    pub fn from_definitions(definitions: impl IntoIterator<Item = CommandDefinition>) -> Self {
        let mut manifest = Self::new();
        for definition in definitions {
            manifest.insert(definition);
        }
        manifest
    }

    fn insert(&mut self, definition: CommandDefinition) {
        let shared = Arc::new(definition);
        if let Some(previous) = self
            .by_name
            .insert(shared.name.clone(), Arc::clone(&shared))
        {
            debug!(
                command = %shared.name,
                replaced = %previous.path,
                "command definition overridden"
            );
        }
        self.by_path.insert(shared.path.clone(), shared);
    }

    /// Looks up a definition by bare name, then by path-qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<CommandDefinition>> {
        self.by_name.get(name).or_else(|| self.by_path.get(name))
    }

    /// Looks up a definition by path-qualified name only.
    #[must_use]
    pub fn get_by_path(&self, path: &str) -> Option<&Arc<CommandDefinition>> {
        self.by_path.get(path)
    }

    /// Returns the number of distinct command names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` when no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Returns the registered command names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Builds a [`Manifest`] by reading sources in precedence order.
///
/// Sources are read in the order they were added; a later source overwrites
/// same-named entries from an earlier one. Register the global source first
/// and the project-local source second.
///
/// # Example
///
/// ```
/// use taskchain::command::adapters::InMemoryCommandSource;
/// use taskchain::command::services::ManifestBuilder;
///
/// let global = InMemoryCommandSource::new("global").with_document("review", "global body");
/// let local = InMemoryCommandSource::new("local").with_document("review", "local body");
///
/// let manifest = ManifestBuilder::new()
///     .with_source(global)
///     .with_source(local)
///     .build();
///
/// let review = manifest.get("review").expect("review is registered");
/// assert_eq!(review.template, "local body");
/// ```
#[derive(Clone, Default)]
pub struct ManifestBuilder {
    sources: Vec<Arc<dyn CommandSource>>,
}

impl ManifestBuilder {
    /// Creates a builder with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source with higher precedence than those already added.
    #[must_use]
    pub fn with_source(mut self, source: impl CommandSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Appends a shared source.
    #[must_use]
    pub fn with_shared_source(mut self, source: Arc<dyn CommandSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Reads every source and assembles a fresh manifest.
    ///
    /// Safe to call repeatedly; each call is a full rebuild. A source that
    /// fails to enumerate contributes nothing.
    #[must_use]
    pub fn build(&self) -> Manifest {
        let mut manifest = Manifest::new();
        for source in &self.sources {
            let documents = match source.documents() {
                Ok(documents) => documents,
                Err(error) => {
                    warn!(source = source.label(), %error, "command source unavailable");
                    continue;
                }
            };
            debug!(source = source.label(), count = documents.len(), "read command source");
            for document in documents {
                let path = document.qualified_name();
                manifest.insert(parse_definition(document.name(), &path, &document.contents));
            }
        }
        info!(commands = ?manifest.names(), "loaded command manifest");
        manifest
    }
}
