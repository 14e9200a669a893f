//! Then steps for orchestration BDD scenarios.

use super::world::OrchestrationWorld;
use conductor::conversation::domain::Message;
use conductor::graph::services::{OrchestrationError, RoutingError};
use rstest_bdd_macros::then;

#[then("the run terminates after {steps:usize} steps")]
fn run_terminates(world: &OrchestrationWorld, steps: usize) -> Result<(), eyre::Report> {
    let report = world.report()?;
    if report.steps != steps {
        return Err(eyre::eyre!(
            "expected {steps} steps, terminated after {}",
            report.steps
        ));
    }
    Ok(())
}

#[then(
    "the conversation holds {agents:usize} agent messages and {results:usize} capability results"
)]
fn conversation_holds(
    world: &OrchestrationWorld,
    agents: usize,
    results: usize,
) -> Result<(), eyre::Report> {
    let state = &world.report()?.state;
    let found_agents = state.count_messages(Message::is_agent);
    let found_results = state.count_messages(Message::is_capability_result);
    if (found_agents, found_results) != (agents, results) {
        return Err(eyre::eyre!(
            "expected {agents} agent messages and {results} results, found {found_agents} and {found_results}"
        ));
    }
    Ok(())
}

#[then(r#"the last capability result contains "{text}""#)]
fn last_result_contains(world: &OrchestrationWorld, text: String) -> Result<(), eyre::Report> {
    let result = world
        .report()?
        .state
        .messages()
        .iter()
        .rev()
        .find(|message| message.is_capability_result())
        .ok_or_else(|| eyre::eyre!("no capability result in the conversation"))?;
    if !result.content().contains(&text) {
        return Err(eyre::eyre!(
            "expected result to contain '{text}', got '{}'",
            result.content()
        ));
    }
    Ok(())
}

#[then("the run stops at the step ceiling after {steps:usize} steps")]
fn run_stops_at_ceiling(world: &OrchestrationWorld, steps: usize) -> Result<(), eyre::Report> {
    let failure = world.failure()?;
    if !matches!(failure.kind(), OrchestrationError::MaxStepsExceeded { .. }) {
        return Err(eyre::eyre!("expected step ceiling, got {:?}", failure.kind()));
    }
    if failure.steps() != steps {
        return Err(eyre::eyre!(
            "expected {steps} steps, stopped after {}",
            failure.steps()
        ));
    }
    Ok(())
}

#[then(r#"the run halts because "{from}" may not hand off to "{to}""#)]
fn run_halts_on_allow_list(
    world: &OrchestrationWorld,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let failure = world.failure()?;
    match failure.kind() {
        OrchestrationError::Routing(RoutingError::NotAllowed {
            from: actual_from,
            to: actual_to,
        }) if actual_from.as_str() == from && *actual_to == to => Ok(()),
        other => Err(eyre::eyre!("expected '{from}' -> '{to}' to be rejected, got {other:?}")),
    }
}
