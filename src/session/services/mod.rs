//! Application services for session orchestration.

mod continuation;
mod orchestrator;
mod store;

pub use continuation::{Continuation, ContinuationQueue};
pub use orchestrator::SessionOrchestrator;
pub use store::SessionStore;
