//! Domain types for session orchestration.

mod arguments;
mod events;
mod ids;
mod state;

pub use arguments::{InvocationArguments, PIPE_SEPARATOR};
pub use events::{
    CommandDispatch, HOST_GENERIC_PROMPT, OutputPart, RenderRequest, SUBTASK_TOOL_NAME,
    SubtaskArgs, ToolInvocation, TurnCompleted,
};
pub use ids::{CallId, SessionId};
pub use state::SessionState;
