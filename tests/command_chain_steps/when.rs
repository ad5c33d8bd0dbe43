//! When steps for command chain BDD scenarios.

use super::world::{ChainWorld, run_async};
use rstest_bdd_macros::when;
use taskchain::command::domain::SubtaskSpec;
use taskchain::history::domain::{Message, MessagePart, Role};
use taskchain::session::domain::{
    CallId, CommandDispatch, HOST_GENERIC_PROMPT, OutputPart, RenderRequest, SubtaskArgs,
    ToolInvocation, TurnCompleted,
};

#[when(r#"the user runs "{command}" with arguments "{arguments}" as a subtask"#)]
fn user_runs_subtask(
    world: &mut ChainWorld,
    command: String,
    arguments: String,
) -> Result<(), eyre::Report> {
    let prompt = format!("{command} {arguments}");
    let mut parts = vec![OutputPart::Subtask(SubtaskSpec {
        agent: "general".to_owned(),
        model: None,
        description: command.clone(),
        command: command.clone(),
        prompt: prompt.clone(),
    })];
    let dispatch = CommandDispatch::new(command.as_str(), world.session_id.clone(), arguments);
    let call_id = world.mint_call_id();
    let invocation = ToolInvocation::subtask(CallId::new(call_id), world.session_id.clone());
    let mut args = SubtaskArgs::for_command(command.as_str(), prompt);

    let orchestrator = world.orchestrator()?;
    run_async(orchestrator.before_command(&dispatch, &mut parts));
    run_async(orchestrator.before_tool_invoke(&invocation, &mut args));
    orchestrator.after_tool_invoke(&invocation);

    world.dispatch_parts = parts;
    world.subtask_prompt = Some(args.prompt);
    Ok(())
}

#[when(r#"the user runs "{command}" with arguments "{arguments}""#)]
fn user_runs_command(
    world: &mut ChainWorld,
    command: String,
    arguments: String,
) -> Result<(), eyre::Report> {
    let mut parts = vec![OutputPart::text(arguments.as_str())];
    let dispatch = CommandDispatch::new(command, world.session_id.clone(), arguments);
    run_async(world.orchestrator()?.before_command(&dispatch, &mut parts));
    world.dispatch_parts = parts;
    Ok(())
}

#[when(r#"a subtask is started with the prompt "{prompt}""#)]
fn subtask_started(world: &mut ChainWorld, prompt: String) -> Result<(), eyre::Report> {
    let call_id = world.mint_call_id();
    let invocation = ToolInvocation::subtask(CallId::new(call_id), world.session_id.clone());
    let mut args = SubtaskArgs {
        prompt,
        ..SubtaskArgs::default()
    };
    run_async(world.orchestrator()?.before_tool_invoke(&invocation, &mut args));
    world.subtask_prompt = Some(args.prompt);
    Ok(())
}

#[when("the host renders the generic placeholder")]
fn host_renders_placeholder(world: &mut ChainWorld) -> Result<(), eyre::Report> {
    let mut messages = vec![
        Message::with_text(Role::Assistant, "Subtask finished."),
        Message::with_text(Role::User, HOST_GENERIC_PROMPT),
    ];
    world
        .orchestrator()?
        .before_messages_rendered(&RenderRequest::default(), &mut messages);
    let rendered = messages
        .last()
        .and_then(|message| message.parts.first())
        .and_then(|part| match part {
            MessagePart::Text { text } => Some(text.clone()),
            _ => None,
        })
        .ok_or_else(|| eyre::eyre!("placeholder message lost its text part"))?;
    world.placeholder = Some(rendered);
    Ok(())
}

#[when("the turn completes")]
fn turn_completes(world: &mut ChainWorld) -> Result<(), eyre::Report> {
    let event = TurnCompleted {
        session_id: world.session_id.clone(),
    };
    world.orchestrator()?.after_turn_complete(&event);
    Ok(())
}

#[when("the commands are reloaded")]
fn commands_reloaded(world: &mut ChainWorld) -> Result<(), eyre::Report> {
    let count = world.plugin()?.reload_commands();
    world.reloaded_count = Some(count);
    Ok(())
}
