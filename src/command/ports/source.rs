//! Command-definition source port.
//!
//! A source enumerates raw definition documents. The manifest builder reads
//! several sources in precedence order.

use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Result type for command source operations.
pub type CommandSourceResult<T> = Result<T, CommandSourceError>;

/// A raw document discovered by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path relative to the source root, extension stripped.
    pub path: Utf8PathBuf,
    /// Raw document text.
    pub contents: String,
}

impl SourceDocument {
    /// Creates a source document.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Returns the lookup name: the final path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or_else(|| self.path.as_str())
    }

    /// Returns the path-qualified name with `/` separators.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualified(&self.path)
    }
}

fn qualified(path: &Utf8Path) -> String {
    path.components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Port for enumerating command-definition documents.
pub trait CommandSource: Send + Sync {
    /// Human-readable label used in logs.
    fn label(&self) -> &str;

    /// Lists every document in the source.
    ///
    /// A source whose backing location does not exist returns an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`CommandSourceError`] when the source exists but cannot be
    /// enumerated.
    fn documents(&self) -> CommandSourceResult<Vec<SourceDocument>>;
}

/// Errors raised while enumerating a command source.
#[derive(Debug, Clone, Error)]
pub enum CommandSourceError {
    /// The source root could not be opened.
    #[error("command source '{root}' could not be opened: {source}")]
    Open {
        /// Root of the source.
        root: Utf8PathBuf,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// A directory inside the source could not be listed.
    #[error("command source directory '{path}' could not be listed: {source}")]
    List {
        /// Directory that failed.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },
}
