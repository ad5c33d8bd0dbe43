//! Plugin entry point wiring configuration, commands and orchestration.

use std::sync::Arc;

use tracing::info;

use crate::command::adapters::DirectoryCommandSource;
use crate::command::services::ManifestBuilder;
use crate::config::{PluginPaths, load_config};
use crate::session::ports::SessionHost;
use crate::session::services::SessionOrchestrator;

/// A running plugin instance.
///
/// Holds the orchestrator that hosts feed lifecycle notifications into and
/// the command sources used to rebuild its manifest.
pub struct CommandPlugin<H>
where
    H: SessionHost,
{
    paths: PluginPaths,
    builder: ManifestBuilder,
    orchestrator: Arc<SessionOrchestrator<H>>,
}

impl<H> CommandPlugin<H>
where
    H: SessionHost + 'static,
{
    /// Loads configuration, builds the manifest from the global then local
    /// command directories and starts the orchestrator.
    ///
    /// Logging is not installed here; see
    /// [`crate::telemetry::init_file_logging`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start(paths: PluginPaths, host: Arc<H>) -> Self {
        let config = load_config(&paths.config_file);
        let builder = ManifestBuilder::new()
            .with_source(DirectoryCommandSource::new(
                "global",
                paths.global_commands.clone(),
            ))
            .with_source(DirectoryCommandSource::new(
                "local",
                paths.local_commands.clone(),
            ));
        let manifest = builder.build();
        info!(
            commands = manifest.len(),
            replace_generic = config.replace_generic,
            "plugin started"
        );
        let orchestrator = Arc::new(SessionOrchestrator::new(host, manifest, config));
        Self {
            paths,
            builder,
            orchestrator,
        }
    }
}

impl<H> CommandPlugin<H>
where
    H: SessionHost,
{
    /// Returns the orchestrator receiving lifecycle notifications.
    #[must_use]
    pub const fn orchestrator(&self) -> &Arc<SessionOrchestrator<H>> {
        &self.orchestrator
    }

    /// Returns the filesystem layout in use.
    #[must_use]
    pub const fn paths(&self) -> &PluginPaths {
        &self.paths
    }

    /// Rebuilds the manifest from the command directories and swaps it in.
    ///
    /// Returns the number of commands now registered.
    pub fn reload_commands(&self) -> usize {
        let manifest = self.builder.build();
        let count = manifest.len();
        self.orchestrator.replace_manifest(manifest);
        count
    }
}
