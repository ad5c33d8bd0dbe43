//! Filesystem command source backed by `cap-std`.

use std::io::ErrorKind;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::{debug, warn};

use crate::command::ports::{
    CommandSource, CommandSourceError, CommandSourceResult, SourceDocument,
};

/// Default document extension.
pub const DEFAULT_EXTENSION: &str = "md";

/// Recursively enumerates definition documents below a root directory.
///
/// A root that does not exist contributes no documents. Entries are visited
/// in name order so repeated scans are deterministic.
#[derive(Debug, Clone)]
pub struct DirectoryCommandSource {
    label: String,
    root: Utf8PathBuf,
    extension: String,
}

impl DirectoryCommandSource {
    /// Creates a source rooted at `root` matching `*.md` documents.
    #[must_use]
    pub fn new(label: impl Into<String>, root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            label: label.into(),
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// Overrides the document extension (without the leading dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn walk(
        &self,
        dir: &Dir,
        relative: &Utf8Path,
        documents: &mut Vec<SourceDocument>,
    ) -> CommandSourceResult<()> {
        let entries = dir.entries().map_err(|error| CommandSourceError::List {
            path: self.root.join(relative),
            source: Arc::new(error),
        })?;

        let mut children = Vec::new();
        for entry in entries {
            let listed = entry.and_then(|item| Ok((item.file_name()?, item.file_type()?)));
            match listed {
                Ok((name, file_type)) => children.push((name, file_type.is_dir())),
                Err(error) => {
                    warn!(source = %self.label, path = %self.root.join(relative), %error, "skipping unreadable entry");
                }
            }
        }
        children.sort();

        for (name, is_dir) in children {
            let child = relative.join(&name);
            if is_dir {
                match dir.open_dir(&name) {
                    Ok(subdir) => self.walk(&subdir, &child, documents)?,
                    Err(error) => {
                        warn!(source = %self.label, path = %child, %error, "skipping unreadable directory");
                    }
                }
                continue;
            }

            if child.extension() != Some(self.extension.as_str()) {
                continue;
            }
            match dir.read_to_string(&name) {
                Ok(contents) => documents.push(SourceDocument::new(child.with_extension(""), contents)),
                Err(error) => {
                    warn!(source = %self.label, path = %child, %error, "skipping unreadable document");
                }
            }
        }
        Ok(())
    }
}

impl CommandSource for DirectoryCommandSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn documents(&self) -> CommandSourceResult<Vec<SourceDocument>> {
        let root = match Dir::open_ambient_dir(&self.root, ambient_authority()) {
            Ok(root) => root,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(source = %self.label, root = %self.root, "command directory absent");
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(CommandSourceError::Open {
                    root: self.root.clone(),
                    source: Arc::new(error),
                });
            }
        };

        let mut documents = Vec::new();
        self.walk(&root, Utf8Path::new(""), &mut documents)?;
        Ok(documents)
    }
}
