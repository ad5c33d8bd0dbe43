//! Then steps for command chain BDD scenarios.

use super::world::{ChainWorld, run_async};
use rstest_bdd_macros::then;
use taskchain::config::DEFAULT_GENERIC_RETURN;
use taskchain::session::adapters::HostCall;
use taskchain::session::domain::OutputPart;

fn placeholder(world: &ChainWorld) -> Result<&str, eyre::Report> {
    world
        .placeholder
        .as_deref()
        .ok_or_else(|| eyre::eyre!("placeholder was not rendered"))
}

fn subtask_prompt(world: &ChainWorld) -> Result<&str, eyre::Report> {
    world
        .subtask_prompt
        .as_deref()
        .ok_or_else(|| eyre::eyre!("no subtask was started"))
}

#[then(r#"the placeholder reads "{expected}""#)]
fn placeholder_reads(world: &mut ChainWorld, expected: String) -> Result<(), eyre::Report> {
    let actual = placeholder(world)?;
    if actual != expected {
        return Err(eyre::eyre!("expected placeholder {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("the placeholder reads the default generic return")]
fn placeholder_reads_default(world: &mut ChainWorld) -> Result<(), eyre::Report> {
    let actual = placeholder(world)?;
    if actual != DEFAULT_GENERIC_RETURN {
        return Err(eyre::eyre!("expected the default generic return, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the host receives the message "{text}""#)]
fn host_receives_message(world: &mut ChainWorld, text: String) -> Result<(), eyre::Report> {
    run_async(world.orchestrator()?.continuations().flush());
    let calls = world
        .host
        .calls()
        .map_err(|err| eyre::eyre!("read host calls: {err}"))?;
    let expected = HostCall::Message {
        session_id: world.session_id.clone(),
        text,
    };
    if calls != vec![expected.clone()] {
        return Err(eyre::eyre!("expected only {expected:?}, host saw {calls:?}"));
    }
    Ok(())
}

#[then(r#"the dispatch contains a subtask "{command}" with prompt "{prompt}""#)]
fn dispatch_contains_subtask(
    world: &mut ChainWorld,
    command: String,
    prompt: String,
) -> Result<(), eyre::Report> {
    let found = world.dispatch_parts.iter().any(|part| match part {
        OutputPart::Subtask(spec) => spec.command == command && spec.prompt == prompt,
        OutputPart::Text { .. } => false,
    });
    if !found {
        return Err(eyre::eyre!(
            "no subtask {command:?} with prompt {prompt:?} in {:?}",
            world.dispatch_parts
        ));
    }
    Ok(())
}

#[then(r#"the subtask prompt includes "{first}" and "{second}""#)]
fn subtask_prompt_includes(
    world: &mut ChainWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let prompt = subtask_prompt(world)?;
    for needle in [&first, &second] {
        if !prompt.contains(needle.as_str()) {
            return Err(eyre::eyre!("prompt {prompt:?} is missing {needle:?}"));
        }
    }
    Ok(())
}

#[then(r#"the subtask prompt excludes "{text}""#)]
fn subtask_prompt_excludes(world: &mut ChainWorld, text: String) -> Result<(), eyre::Report> {
    let prompt = subtask_prompt(world)?;
    if prompt.contains(text.as_str()) {
        return Err(eyre::eyre!("prompt {prompt:?} unexpectedly contains {text:?}"));
    }
    Ok(())
}

#[then(r#"the command "{name}" renders "{expected}""#)]
fn command_renders(
    world: &mut ChainWorld,
    name: String,
    expected: String,
) -> Result<(), eyre::Report> {
    let manifest = world.orchestrator()?.manifest();
    let definition = manifest
        .get(&name)
        .ok_or_else(|| eyre::eyre!("command {name:?} is not registered"))?;
    let rendered = definition.render_prompt("");
    if rendered != expected {
        return Err(eyre::eyre!("expected {expected:?}, rendered {rendered:?}"));
    }
    Ok(())
}

#[then("{count:usize} command is registered")]
fn commands_registered(world: &mut ChainWorld, count: usize) -> Result<(), eyre::Report> {
    let reloaded = world
        .reloaded_count
        .ok_or_else(|| eyre::eyre!("commands were not reloaded"))?;
    let registered = world.orchestrator()?.manifest().len();
    if reloaded != count || registered != count {
        return Err(eyre::eyre!(
            "expected {count} commands, reload reported {reloaded} and manifest holds {registered}"
        ));
    }
    Ok(())
}
