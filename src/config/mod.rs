//! Persisted plugin configuration and filesystem layout.
//!
//! The configuration file is JSON with `//` and `/* */` comments. A missing
//! file is replaced by a commented template; a malformed one is reported
//! and left alone. Either way callers receive usable defaults.

use std::io::ErrorKind;
use std::sync::{Arc, LazyLock};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Text injected in place of the host's generic placeholder when no
/// override is configured.
pub const DEFAULT_GENERIC_RETURN: &str = "Review, challenge and validate the task output against the codebase then continue with the next logical step.";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "taskchain.jsonc";

/// Template written when no configuration file exists.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"{
  // Replace the host's generic "Summarize..." prompt when no return is specified
  "replace_generic": true

  // Custom prompt to use instead of the built-in replacement
  // "generic_return": "Challenge and validate the task tool output above. Verify assumptions, identify gaps or errors, then continue with the next logical step."
}
"#;

const HOST_CONFIG_DIR: &str = ".config/opencode";

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("line comment pattern is valid"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment pattern is valid"));

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The file path has no parent directory or file name.
    #[error("invalid configuration path {0}")]
    InvalidPath(Utf8PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        source: Arc<std::io::Error>,
    },

    /// The file contents are not a valid configuration.
    #[error("invalid configuration {path}: {source}")]
    Parse {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying decode error.
        source: Arc<serde_json::Error>,
    },

    /// The default template could not be written.
    #[error("failed to write configuration {path}: {source}")]
    Write {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        source: Arc<std::io::Error>,
    },
}

/// User-tunable plugin behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Replace the host's generic placeholder after subtasks that have no
    /// return item.
    pub replace_generic: bool,
    /// Override for [`DEFAULT_GENERIC_RETURN`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_return: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            replace_generic: true,
            generic_return: None,
        }
    }
}

impl PluginConfig {
    /// Returns the text used to replace the generic placeholder.
    #[must_use]
    pub fn generic_text(&self) -> &str {
        self.generic_return
            .as_deref()
            .unwrap_or(DEFAULT_GENERIC_RETURN)
    }

    /// Decodes a configuration from commented JSON.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the text is not valid JSON after
    /// comment removal or when `replace_generic` is missing or mistyped.
    pub fn from_jsonc(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&strip_comments(text))
    }
}

/// Removes `//` line comments and `/* */` block comments.
#[must_use]
pub fn strip_comments(text: &str) -> String {
    let without_lines = LINE_COMMENT.replace_all(text, "");
    BLOCK_COMMENT.replace_all(&without_lines, "").into_owned()
}

/// Reads the configuration at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or decoded.
pub fn read_config(path: &Utf8Path) -> ConfigResult<Option<PluginConfig>> {
    let (parent, file_name) = split_path(path)?;
    let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(ConfigError::Read {
                path: path.to_owned(),
                source: Arc::new(error),
            });
        }
    };
    let text = match dir.read_to_string(file_name) {
        Ok(text) => text,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(ConfigError::Read {
                path: path.to_owned(),
                source: Arc::new(error),
            });
        }
    };
    PluginConfig::from_jsonc(&text)
        .map(Some)
        .map_err(|error| ConfigError::Parse {
            path: path.to_owned(),
            source: Arc::new(error),
        })
}

/// Writes [`DEFAULT_CONFIG_TEMPLATE`] to `path`, creating parent
/// directories.
///
/// # Errors
///
/// Returns [`ConfigError::Write`] when the directory or file cannot be
/// written.
pub fn write_default_config(path: &Utf8Path) -> ConfigResult<()> {
    let (parent, file_name) = split_path(path)?;
    let write_error = |error: std::io::Error| ConfigError::Write {
        path: path.to_owned(),
        source: Arc::new(error),
    };
    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(write_error)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(write_error)?;
    dir.write(file_name, DEFAULT_CONFIG_TEMPLATE)
        .map_err(write_error)
}

/// Loads the configuration, falling back to defaults on any failure.
///
/// An absent file is replaced by the commented default template. An
/// unreadable or malformed file is logged and left untouched.
#[must_use]
pub fn load_config(path: &Utf8Path) -> PluginConfig {
    match read_config(path) {
        Ok(Some(config)) => {
            debug!(%path, ?config, "loaded configuration");
            config
        }
        Ok(None) => {
            match write_default_config(path) {
                Ok(()) => info!(%path, "wrote default configuration"),
                Err(error) => warn!(%error, "failed to write default configuration"),
            }
            PluginConfig::default()
        }
        Err(error) => {
            warn!(%error, "using default configuration");
            PluginConfig::default()
        }
    }
}

fn split_path(path: &Utf8Path) -> ConfigResult<(&Utf8Path, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ConfigError::InvalidPath(path.to_owned()))?;
    let parent = path
        .parent()
        .map(|parent| {
            if parent.as_str().is_empty() {
                Utf8Path::new(".")
            } else {
                parent
            }
        })
        .ok_or_else(|| ConfigError::InvalidPath(path.to_owned()))?;
    Ok((parent, file_name))
}

/// Filesystem locations used by the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPaths {
    /// Configuration file.
    pub config_file: Utf8PathBuf,
    /// Command definitions shared across projects.
    pub global_commands: Utf8PathBuf,
    /// Command definitions of the current project.
    pub local_commands: Utf8PathBuf,
    /// Directory receiving the debug log.
    pub log_dir: Utf8PathBuf,
}

impl PluginPaths {
    /// Derives the default layout from the user's home and project
    /// directories.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use taskchain::config::PluginPaths;
    ///
    /// let paths = PluginPaths::from_home(Utf8Path::new("/home/ada"), Utf8Path::new("/work/app"));
    /// assert_eq!(paths.global_commands, "/home/ada/.config/opencode/command");
    /// assert_eq!(paths.local_commands, "/work/app/.opencode/command");
    /// ```
    #[must_use]
    pub fn from_home(home: &Utf8Path, project: &Utf8Path) -> Self {
        let host_config = home.join(HOST_CONFIG_DIR);
        Self {
            config_file: host_config.join(CONFIG_FILE_NAME),
            global_commands: host_config.join("command"),
            local_commands: project.join(".opencode").join("command"),
            log_dir: host_config.join("plugin").join("taskchain").join("logs"),
        }
    }
}
