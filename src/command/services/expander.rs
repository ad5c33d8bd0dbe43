//! Parallel expansion of command definitions into subtask specifications.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::Manifest;
use crate::command::domain::{DEFAULT_SUBTASK_AGENT, ParallelSpec, SubtaskSpec};

/// Default recursion cap for nested `parallel` declarations.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Resolves a definition's `parallel` list into a flat list of subtasks.
///
/// Expansion is depth-first with sibling order preserved. A command name is
/// emitted at most once per top-level [`ParallelExpander::expand`] call,
/// however many times it is reachable, and nesting stops past the depth cap.
#[derive(Debug, Clone, Copy)]
pub struct ParallelExpander<'a> {
    manifest: &'a Manifest,
    max_depth: usize,
}

impl<'a> ParallelExpander<'a> {
    /// Creates an expander reading definitions from `manifest`.
    #[must_use]
    pub const fn new(manifest: &'a Manifest) -> Self {
        Self {
            manifest,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Overrides the recursion cap.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expands `specs` into subtask specifications.
    ///
    /// Each entry's argument is the next value popped from `argument_pipe`,
    /// else the entry's explicit arguments, else `main_arguments`. Entries
    /// naming unknown commands are skipped.
    #[must_use]
    pub fn expand(
        &self,
        specs: &[ParallelSpec],
        main_arguments: &str,
        argument_pipe: &mut VecDeque<String>,
    ) -> Vec<SubtaskSpec> {
        let mut walk = Walk::default();
        self.expand_level(specs, main_arguments, argument_pipe, &mut walk, 0);
        walk.subtasks
    }

    fn expand_level(
        &self,
        specs: &[ParallelSpec],
        main_arguments: &str,
        argument_pipe: &mut VecDeque<String>,
        walk: &mut Walk,
        depth: usize,
    ) {
        if depth > self.max_depth {
            debug!(depth, "parallel expansion depth cap reached");
            return;
        }

        for spec in specs {
            if !walk.visited.insert(spec.command.clone()) {
                debug!(command = %spec.command, "parallel command already expanded");
                continue;
            }
            let Some(definition) = self.manifest.get(&spec.command) else {
                debug!(command = %spec.command, "parallel command not found; skipping");
                continue;
            };

            let argument = argument_pipe
                .pop_front()
                .or_else(|| spec.arguments.clone())
                .unwrap_or_else(|| main_arguments.to_owned());

            walk.subtasks.push(SubtaskSpec {
                agent: definition
                    .agent
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUBTASK_AGENT.to_owned()),
                model: definition.model.clone(),
                description: definition
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Parallel: {}", spec.command)),
                command: spec.command.clone(),
                prompt: definition.render_prompt(&argument),
            });

            if !definition.parallel.is_empty() {
                self.expand_level(
                    &definition.parallel,
                    &argument,
                    argument_pipe,
                    walk,
                    depth + 1,
                );
            }
        }
    }
}

#[derive(Default)]
struct Walk {
    visited: HashSet<String>,
    subtasks: Vec<SubtaskSpec>,
}
