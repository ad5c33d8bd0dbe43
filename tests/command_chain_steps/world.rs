//! Shared world state for command chain BDD scenarios.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use taskchain::config::PluginPaths;
use taskchain::plugin::CommandPlugin;
use taskchain::session::adapters::RecordingSessionHost;
use taskchain::session::domain::{OutputPart, SessionId};
use taskchain::session::services::SessionOrchestrator;
use tempfile::TempDir;

/// Scenario world for command chain behaviour tests.
pub struct ChainWorld {
    /// Scratch directory holding the home and project trees.
    pub root: TempDir,
    /// Filesystem layout handed to the plugin.
    pub paths: PluginPaths,
    /// Host double recording every delivered continuation.
    pub host: Arc<RecordingSessionHost>,
    /// Plugin under test, started by a given step.
    pub plugin: Option<CommandPlugin<RecordingSessionHost>>,
    /// Session all scenario events belong to.
    pub session_id: SessionId,
    /// Parts produced by the last command dispatch.
    pub dispatch_parts: Vec<OutputPart>,
    /// Placeholder text after the last render.
    pub placeholder: Option<String>,
    /// Subtask prompt after the last tool invocation.
    pub subtask_prompt: Option<String>,
    /// Command count reported by the last reload.
    pub reloaded_count: Option<usize>,
    /// Counter used to mint tool call identifiers.
    pub next_call: usize,
}

impl ChainWorld {
    /// Creates a world rooted in a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        let root = TempDir::new().expect("temporary directory is created");
        let base = Utf8PathBuf::from_path_buf(root.path().to_path_buf())
            .expect("temporary directory path is UTF-8");
        let paths = PluginPaths::from_home(&base.join("home"), &base.join("project"));
        Self {
            root,
            paths,
            host: Arc::new(RecordingSessionHost::new()),
            plugin: None,
            session_id: SessionId::new("ses_bdd"),
            dispatch_parts: Vec::new(),
            placeholder: None,
            subtask_prompt: None,
            reloaded_count: None,
            next_call: 0,
        }
    }

    /// Returns the orchestrator of the started plugin.
    pub fn orchestrator(&self) -> Result<&SessionOrchestrator<RecordingSessionHost>, eyre::Report> {
        self.plugin
            .as_ref()
            .map(|plugin| plugin.orchestrator().as_ref())
            .ok_or_else(|| eyre::eyre!("plugin has not been started"))
    }

    /// Returns the started plugin.
    pub fn plugin(&self) -> Result<&CommandPlugin<RecordingSessionHost>, eyre::Report> {
        self.plugin
            .as_ref()
            .ok_or_else(|| eyre::eyre!("plugin has not been started"))
    }

    /// Mints the next tool call identifier.
    pub fn mint_call_id(&mut self) -> String {
        self.next_call += 1;
        format!("call_{}", self.next_call)
    }
}

impl Default for ChainWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ChainWorld {
    ChainWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Writes a command document named `<name>.md` below `dir`.
pub fn write_command(dir: &Utf8Path, name: &str, document: &str) -> Result<(), eyre::Report> {
    std::fs::create_dir_all(dir).map_err(|err| eyre::eyre!("create {dir}: {err}"))?;
    let path = dir.join(format!("{name}.md"));
    std::fs::write(&path, document).map_err(|err| eyre::eyre!("write {path}: {err}"))
}
