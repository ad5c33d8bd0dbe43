//! Given steps for command chain BDD scenarios.

use std::sync::Arc;

use super::world::{ChainWorld, write_command};
use rstest_bdd_macros::given;
use taskchain::history::domain::{Message, MessagePart, Role, ToolStatus};
use taskchain::plugin::CommandPlugin;

#[given(r#"a command "{name}" with template "{template}""#)]
fn command_with_template(
    world: &mut ChainWorld,
    name: String,
    template: String,
) -> Result<(), eyre::Report> {
    write_command(&world.paths.local_commands, &name, &template)
}

#[given(r#"a global command "{name}" with template "{template}""#)]
fn global_command_with_template(
    world: &mut ChainWorld,
    name: String,
    template: String,
) -> Result<(), eyre::Report> {
    write_command(&world.paths.global_commands, &name, &template)
}

#[given(r#"a local command "{name}" with template "{template}""#)]
fn local_command_with_template(
    world: &mut ChainWorld,
    name: String,
    template: String,
) -> Result<(), eyre::Report> {
    write_command(&world.paths.local_commands, &name, &template)
}

#[given(r#"a command "{name}" returning "{first}" then "{second}""#)]
fn command_with_returns(
    world: &mut ChainWorld,
    name: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let document =
        format!("---\nreturn:\n  - {first}\n  - {second}\n---\nRun {name} on $ARGUMENTS\n");
    write_command(&world.paths.local_commands, &name, &document)
}

#[given(r#"a command "{name}" running "{first}" and "{second}" in parallel"#)]
fn command_with_parallel(
    world: &mut ChainWorld,
    name: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let document =
        format!("---\nparallel:\n  - {first}\n  - {second}\n---\nFan out $ARGUMENTS\n");
    write_command(&world.paths.local_commands, &name, &document)
}

#[given("the plugin has loaded its commands")]
fn plugin_loaded(world: &mut ChainWorld) -> Result<(), eyre::Report> {
    if world.plugin.is_some() {
        return Err(eyre::eyre!("plugin already started"));
    }
    world.plugin = Some(CommandPlugin::start(
        world.paths.clone(),
        Arc::clone(&world.host),
    ));
    Ok(())
}

#[given("a session history of {count:usize} messages whose last reply is still running")]
fn history_with_running_reply(world: &mut ChainWorld, count: usize) -> Result<(), eyre::Report> {
    if count == 0 {
        return Err(eyre::eyre!("history needs at least the running reply"));
    }
    let mut history: Vec<Message> = (1..count)
        .zip([Role::User, Role::Assistant].into_iter().cycle())
        .map(|(index, role)| Message::with_text(role, format!("message {index}")))
        .collect();
    history.push(Message::new(Role::Assistant).with_part(MessagePart::Tool {
        tool: "task".to_owned(),
        status: ToolStatus::Running,
        output: None,
    }));
    world
        .host
        .set_history(world.session_id.clone(), history)
        .map_err(|err| eyre::eyre!("store history: {err}"))
}
