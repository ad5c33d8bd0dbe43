//! In-memory command source adapter.

use camino::Utf8PathBuf;

use crate::command::ports::{CommandSource, CommandSourceResult, SourceDocument};

/// A fixed set of documents.
///
/// Suitable for tests and for hosts that ship definitions inline.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandSource {
    label: String,
    documents: Vec<SourceDocument>,
}

impl InMemoryCommandSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            documents: Vec::new(),
        }
    }

    /// Adds a document at `path` (relative, extension stripped).
    #[must_use]
    pub fn with_document(
        mut self,
        path: impl Into<Utf8PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        self.documents.push(SourceDocument::new(path, contents));
        self
    }
}

impl CommandSource for InMemoryCommandSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn documents(&self) -> CommandSourceResult<Vec<SourceDocument>> {
        Ok(self.documents.clone())
    }
}
