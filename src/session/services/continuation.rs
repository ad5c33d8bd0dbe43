//! Fire-and-forget delivery of return continuations.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::session::domain::SessionId;
use crate::session::ports::{SessionHost, SessionHostResult};

/// Follow-up work sent to the host after a command finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Post a prompt as a new message.
    Message {
        /// Target session.
        session_id: SessionId,
        /// Prompt text.
        text: String,
    },
    /// Run a named command.
    Command {
        /// Target session.
        session_id: SessionId,
        /// Command name.
        command: String,
        /// Command arguments.
        arguments: String,
    },
}

impl Continuation {
    /// Returns the session the continuation targets.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        match self {
            Self::Message { session_id, .. } | Self::Command { session_id, .. } => session_id,
        }
    }

    async fn deliver<H>(&self, host: &H) -> SessionHostResult<()>
    where
        H: SessionHost + ?Sized,
    {
        match self {
            Self::Message { session_id, text } => host.send_async_message(session_id, text).await,
            Self::Command {
                session_id,
                command,
                arguments,
            } => host.dispatch_command(session_id, command, arguments).await,
        }
    }
}

enum Job {
    Run(Continuation),
    Barrier(oneshot::Sender<()>),
}

/// Queue routing continuations to one background tokio task per session.
///
/// Delivery failures are logged and dropped. Within a session jobs run one
/// at a time in enqueue order; a slow host call never delays another
/// session's continuations.
#[derive(Debug, Clone)]
pub struct ContinuationQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Run(continuation) => f.debug_tuple("Run").field(continuation).finish(),
            Self::Barrier(_) => f.write_str("Barrier"),
        }
    }
}

impl ContinuationQueue {
    /// Spawns the routing task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn<H>(host: Arc<H>) -> Self
    where
        H: SessionHost + 'static,
    {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            let mut workers: HashMap<SessionId, mpsc::UnboundedSender<Job>> = HashMap::new();
            while let Some(job) = receiver.recv().await {
                match job {
                    Job::Run(continuation) => {
                        let worker = workers
                            .entry(continuation.session_id().clone())
                            .or_insert_with(|| spawn_session_worker(Arc::clone(&host)));
                        if let Err(error) = worker.send(Job::Run(continuation)) {
                            warn!(?error, "session worker stopped; dropping continuation");
                        }
                    }
                    Job::Barrier(waiter) => {
                        let pending: Vec<oneshot::Receiver<()>> = workers
                            .values()
                            .filter_map(|worker| {
                                let (barrier, done) = oneshot::channel();
                                worker.send(Job::Barrier(barrier)).ok().map(|()| done)
                            })
                            .collect();
                        tokio::spawn(release_after(pending, waiter));
                    }
                }
            }
        });
        Self { sender }
    }

    /// Queues a continuation for delivery.
    pub fn enqueue(&self, continuation: Continuation) {
        if let Err(error) = self.sender.send(Job::Run(continuation)) {
            warn!(?error, "continuation worker stopped; dropping continuation");
        }
    }

    /// Waits until every continuation queued before this call has been
    /// attempted.
    pub async fn flush(&self) {
        let (waiter, done) = oneshot::channel();
        if self.sender.send(Job::Barrier(waiter)).is_err() {
            return;
        }
        if done.await.is_err() {
            debug!("continuation worker stopped before flush completed");
        }
    }
}

fn spawn_session_worker<H>(host: Arc<H>) -> mpsc::UnboundedSender<Job>
where
    H: SessionHost + 'static,
{
    let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
    tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            match job {
                Job::Run(continuation) => {
                    if let Err(error) = continuation.deliver(host.as_ref()).await {
                        warn!(
                            session_id = %continuation.session_id(),
                            %error,
                            "continuation delivery failed"
                        );
                    } else {
                        debug!(session_id = %continuation.session_id(), "continuation delivered");
                    }
                }
                Job::Barrier(waiter) => notify(waiter),
            }
        }
    });
    sender
}

async fn release_after(pending: Vec<oneshot::Receiver<()>>, waiter: oneshot::Sender<()>) {
    for done in pending {
        if done.await.is_err() {
            debug!("session worker stopped before barrier");
        }
    }
    notify(waiter);
}

fn notify(waiter: oneshot::Sender<()>) {
    if waiter.send(()).is_err() {
        debug!("flush waiter dropped before barrier");
    }
}
