//! Tests for transcript rendering.

use rstest::rstest;

use crate::history::domain::{Message, MessagePart, Role, ToolStatus};
use crate::history::services::{MAX_TOOL_OUTPUT_CHARS, TranscriptRenderer};
use crate::session::domain::HOST_GENERIC_PROMPT;

#[rstest]
fn messages_render_as_role_tagged_blocks() {
    let messages = [
        Message::with_text(Role::User, "Fix the parser"),
        Message::with_text(Role::Assistant, "Done.")
            .with_part(MessagePart::text("Tests pass.")),
    ];

    let transcript = TranscriptRenderer::new()
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(
        transcript,
        "<user>\nFix the parser\n</user>\n\n<assistant>\nDone.\n\nTests pass.\n</assistant>"
    );
}

#[rstest]
fn messages_without_content_are_skipped() {
    let messages = [
        Message::with_text(Role::User, "Hello"),
        Message::new(Role::Assistant).with_part(MessagePart::Other),
        Message::with_text(Role::Assistant, "   "),
    ];

    let transcript = TranscriptRenderer::new()
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(transcript, "<user>\nHello\n</user>");
}

#[rstest]
#[case(Some("Check the edge cases"), "<user>\nCheck the edge cases\n</user>")]
#[case(None, "")]
fn generic_placeholder_uses_cached_return(#[case] cached: Option<&str>, #[case] expected: &str) {
    let messages = [Message::with_text(Role::User, HOST_GENERIC_PROMPT)];

    let transcript = TranscriptRenderer::new()
        .with_cached_return(cached)
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(transcript, expected);
}

#[rstest]
fn subtask_output_is_unwrapped() {
    let output = "The parser is fixed.\n\n<task_metadata>\nsession_id: ses_9\n</task_metadata>";
    let messages = [Message::new(Role::Assistant).with_part(MessagePart::completed_tool("task", output))];

    let transcript = TranscriptRenderer::new()
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(transcript, "<assistant>\nThe parser is fixed.\n</assistant>");
}

#[rstest]
fn other_tool_output_is_wrapped() {
    let messages = [Message::new(Role::Assistant).with_part(MessagePart::completed_tool("bash", "ok"))];

    let transcript = TranscriptRenderer::new()
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(
        transcript,
        "<assistant>\n<tool name=\"bash\">\nok\n</tool>\n</assistant>"
    );
}

#[rstest]
fn oversized_tool_output_is_dropped() {
    let huge = "x".repeat(MAX_TOOL_OUTPUT_CHARS);
    let messages = [Message::new(Role::Assistant)
        .with_part(MessagePart::text("Ran the build."))
        .with_part(MessagePart::completed_tool("bash", huge))];

    let transcript = TranscriptRenderer::new()
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(transcript, "<assistant>\nRan the build.\n</assistant>");
}

#[rstest]
fn unfinished_tools_are_not_rendered() {
    let messages = [Message::new(Role::Assistant)
        .with_part(MessagePart::Tool {
            tool: "bash".to_owned(),
            status: ToolStatus::Running,
            output: None,
        })
        .with_part(MessagePart::text("Waiting."))];

    let transcript = TranscriptRenderer::new()
        .render(&messages)
        .expect("render succeeds");

    assert_eq!(transcript, "<assistant>\nWaiting.\n</assistant>");
}

#[rstest]
fn tool_ceiling_can_be_lowered() {
    let messages = [Message::new(Role::Assistant).with_part(MessagePart::completed_tool("bash", "0123456789"))];

    let transcript = TranscriptRenderer::new()
        .with_max_tool_output(10)
        .render(&messages)
        .expect("render succeeds");

    assert!(transcript.is_empty());
}
