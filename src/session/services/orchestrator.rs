//! Session orchestration across host lifecycle notifications.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use super::{Continuation, ContinuationQueue, SessionStore};
use crate::command::domain::{CommandDefinition, ReturnItem};
use crate::command::services::{Manifest, ParallelExpander};
use crate::config::PluginConfig;
use crate::history::domain::{Message, MessagePart, has_turn_references};
use crate::history::services::TurnReferenceResolver;
use crate::session::domain::{
    CommandDispatch, HOST_GENERIC_PROMPT, InvocationArguments, OutputPart, PIPE_SEPARATOR,
    RenderRequest, SessionId, SessionState, SubtaskArgs, ToolInvocation, TurnCompleted,
};
use crate::session::ports::SessionHost;

/// Drives command chains from host lifecycle notifications.
///
/// A session moves from command dispatch through subtask execution to the
/// host's generic placeholder, where the first return item is injected.
/// Remaining return items are then delivered one per completed turn
/// through the [`ContinuationQueue`].
pub struct SessionOrchestrator<H>
where
    H: SessionHost,
{
    store: SessionStore,
    manifest: RwLock<Arc<Manifest>>,
    resolver: TurnReferenceResolver<H>,
    continuations: ContinuationQueue,
    config: PluginConfig,
}

impl<H> SessionOrchestrator<H>
where
    H: SessionHost + 'static,
{
    /// Creates an orchestrator and spawns its continuation worker.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(host: Arc<H>, manifest: Manifest, config: PluginConfig) -> Self {
        Self {
            store: SessionStore::new(),
            manifest: RwLock::new(Arc::new(manifest)),
            resolver: TurnReferenceResolver::new(Arc::clone(&host)),
            continuations: ContinuationQueue::spawn(host),
            config,
        }
    }
}

impl<H> SessionOrchestrator<H>
where
    H: SessionHost,
{
    /// Returns the session state store.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the continuation queue.
    #[must_use]
    pub const fn continuations(&self) -> &ContinuationQueue {
        &self.continuations
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Returns the manifest currently in use.
    #[must_use]
    pub fn manifest(&self) -> Arc<Manifest> {
        Arc::clone(
            &self
                .manifest
                .read()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Swaps in a rebuilt manifest for subsequent notifications.
    pub fn replace_manifest(&self, manifest: Manifest) {
        *self
            .manifest
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(manifest);
    }

    fn definition(&self, command: &str) -> Option<Arc<CommandDefinition>> {
        self.manifest().get(command).cloned()
    }

    /// Handles a command about to be dispatched.
    ///
    /// Tracks the command, stores piped arguments, resolves turn references
    /// and appends parallel subtasks to `parts`.
    pub async fn before_command(&self, dispatch: &CommandDispatch, parts: &mut Vec<OutputPart>) {
        let session_id = &dispatch.session_id;
        let invocation = InvocationArguments::parse(&dispatch.arguments);
        let piped = invocation.is_piped();
        let (main_arguments, pipe) = invocation.into_parts();

        self.store.with_session(session_id, |state| {
            state.main_command = Some(dispatch.command.clone());
            if piped {
                state.argument_pipe = pipe;
            }
        });
        info!(%session_id, command = %dispatch.command, piped, "command dispatched");

        let raw = dispatch.arguments.trim();
        if piped {
            for part in parts.iter_mut() {
                if part.content().contains(raw) {
                    let rewritten = part.content().replace(raw, &main_arguments);
                    *part.content_mut() = rewritten;
                }
            }
        }

        let cached_return = self.store.cached_return(session_id);
        for part in parts.iter_mut() {
            if has_turn_references(part.content()) {
                let resolved = self
                    .resolver
                    .resolve(part.content(), session_id, cached_return.as_deref())
                    .await;
                *part.content_mut() = resolved;
            }
        }
        let resolved_arguments = if has_turn_references(&main_arguments) {
            self.resolver
                .resolve(&main_arguments, session_id, cached_return.as_deref())
                .await
        } else {
            main_arguments
        };

        let manifest = self.manifest();
        let Some(definition) = manifest.get(&dispatch.command) else {
            debug!(command = %dispatch.command, "command not in manifest");
            return;
        };

        if !parts.iter().any(OutputPart::is_subtask) && !definition.return_sequence.is_empty() {
            self.store.with_session(session_id, |state| {
                state
                    .pending_non_subtask_returns
                    .extend(definition.return_sequence.iter().cloned());
            });
            debug!(%session_id, command = %dispatch.command, "queued returns without subtask");
        }

        if !definition.parallel.is_empty() {
            let expander = ParallelExpander::new(&manifest);
            let subtasks = self.store.with_session(session_id, |state| {
                expander.expand(
                    &definition.parallel,
                    &resolved_arguments,
                    &mut state.argument_pipe,
                )
            });
            debug!(%session_id, count = subtasks.len(), "appended parallel subtasks");
            parts.extend(subtasks.into_iter().map(OutputPart::Subtask));
        }
    }

    /// Handles a delegated subtask about to run.
    ///
    /// Other tools are ignored.
    pub async fn before_tool_invoke(&self, invocation: &ToolInvocation, args: &mut SubtaskArgs) {
        if !invocation.is_subtask() {
            return;
        }
        let session_id = &invocation.session_id;
        let requested = args.command.as_deref();

        let first_touch = self.store.with_session(session_id, |state| {
            state.subtask_active = true;
            match (&state.main_command, requested) {
                (None, Some(command)) => {
                    state.main_command = Some(command.to_owned());
                    true
                }
                _ => false,
            }
        });

        if first_touch && args.prompt.contains(PIPE_SEPARATOR) {
            let invocation_arguments = InvocationArguments::parse(&args.prompt);
            if invocation_arguments.is_piped() {
                let (prompt, pipe) = invocation_arguments.into_parts();
                args.prompt = prompt;
                self.store
                    .with_session(session_id, |state| state.argument_pipe = pipe);
                debug!(%session_id, "recovered piped arguments from subtask prompt");
            }
        }

        let owner = self
            .store
            .take_pending_parent()
            .unwrap_or_else(|| session_id.clone());
        if has_turn_references(&args.prompt) {
            let cached_return = self.store.cached_return(&owner);
            args.prompt = self
                .resolver
                .resolve(&args.prompt, &owner, cached_return.as_deref())
                .await;
        }

        let Some(command) = args.command.clone() else {
            return;
        };
        self.store
            .record_call(invocation.call_id.clone(), command.clone());

        let Some(definition) = self.definition(&command) else {
            return;
        };
        let subsequent = definition.subsequent_returns();
        self.store.with_session(session_id, |state| {
            if state.main_command.as_deref() == Some(command.as_str()) && !subsequent.is_empty() {
                state.remaining_returns = subsequent.iter().cloned().collect();
            }
        });
        debug!(%session_id, call_id = %invocation.call_id, %command, "subtask starting");
    }

    /// Handles a delegated subtask that finished, staging the command's
    /// first return item.
    pub fn after_tool_invoke(&self, invocation: &ToolInvocation) {
        if !invocation.is_subtask() {
            return;
        }
        let session_id = &invocation.session_id;
        let Some(command) = self.store.take_call(&invocation.call_id) else {
            debug!(call_id = %invocation.call_id, "no tracked command for call");
            return;
        };
        let Some(first) = self
            .definition(&command)
            .and_then(|definition| definition.first_return().cloned())
        else {
            return;
        };
        let staged = self.store.with_session(session_id, |state| {
            state.main_command.as_deref() == Some(command.as_str()) && state.stage_return(first)
        });
        if staged {
            info!(%session_id, %command, "staged return");
        }
    }

    /// Rewrites the last generic placeholder in `messages`.
    ///
    /// A staged prompt replaces the placeholder; a staged command blanks it
    /// and is dispatched as a continuation. Without a staged return, the
    /// configured generic text replaces it after a subtask when enabled.
    pub fn before_messages_rendered(&self, request: &RenderRequest, messages: &mut [Message]) {
        let Some(placeholder) = last_generic_placeholder(messages) else {
            return;
        };
        let scope = request.session_id.as_ref();

        if let Some((session_id, item)) = self.store.claim_pending_return(scope) {
            match &item {
                ReturnItem::Prompt { text } => placeholder.clone_from(text),
                ReturnItem::CommandRef { .. } => placeholder.clear(),
            }
            info!(%session_id, %item, "injected return");
            if item.is_command_ref() {
                self.execute_return(item, &session_id);
            }
            return;
        }

        if !self.config.replace_generic {
            return;
        }
        if let Some(session_id) = self.store.claim_active_subtask(scope) {
            self.config.generic_text().clone_into(placeholder);
            debug!(%session_id, "replaced generic placeholder");
        }
    }

    /// Dispatches the session's next follow-up return, if any.
    pub fn after_turn_complete(&self, event: &TurnCompleted) {
        let session_id = &event.session_id;
        if let Some(item) = self
            .store
            .with_session(session_id, SessionState::next_follow_up)
        {
            self.execute_return(item, session_id);
        }
    }

    /// Sends `item` to the host as a continuation, at most once per
    /// session.
    ///
    /// Command references consume the next piped argument in preference to
    /// their inline arguments and become the session's tracked command.
    pub fn execute_return(&self, item: ReturnItem, session_id: &SessionId) {
        if !self.store.mark_executed(session_id, &item) {
            debug!(%session_id, %item, "return already executed");
            return;
        }
        let continuation = match item {
            ReturnItem::Prompt { text } => Continuation::Message {
                session_id: session_id.clone(),
                text,
            },
            ReturnItem::CommandRef { name, arguments } => {
                let effective_arguments = self.store.with_session(session_id, |state| {
                    state.main_command = Some(name.clone());
                    state
                        .argument_pipe
                        .pop_front()
                        .or(arguments)
                        .unwrap_or_default()
                });
                self.store.set_pending_parent(session_id.clone());
                Continuation::Command {
                    session_id: session_id.clone(),
                    command: name,
                    arguments: effective_arguments,
                }
            }
        };
        info!(%session_id, ?continuation, "queued continuation");
        self.continuations.enqueue(continuation);
    }
}

fn last_generic_placeholder(messages: &mut [Message]) -> Option<&mut String> {
    messages
        .iter_mut()
        .rev()
        .flat_map(|message| message.parts.iter_mut().rev())
        .find_map(|part| match part {
            MessagePart::Text { text } if text.trim() == HOST_GENERIC_PROMPT => Some(text),
            _ => None,
        })
}
