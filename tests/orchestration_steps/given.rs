//! Given steps for orchestration BDD scenarios.

use std::sync::Arc;

use super::world::{OrchestrationWorld, document_registry, paper_team};
use conductor::agent::ports::AgentReply;
use conductor::conversation::domain::{ArtifactReference, CapabilityInvocation};
use rstest_bdd_macros::given;
use serde_json::json;

const SEEDED_DOCUMENT: &str = "2401.00001";

#[given("the paper team graph over a seeded document library")]
fn paper_team_graph(world: &mut OrchestrationWorld) -> Result<(), eyre::Report> {
    world.topology = Some(paper_team()?);
    world.registry = Arc::new(document_registry(SEEDED_DOCUMENT)?);
    Ok(())
}

#[given(r#""{node}" hands off to "{target}""#)]
fn hands_off(world: &mut OrchestrationWorld, node: String, target: String) {
    world.script(
        &node,
        AgentReply::text(format!("<next_agent>{target}</next_agent>")),
    );
}

#[given(r#""{node}" keeps handing off to "{target}""#)]
fn keeps_handing_off(world: &mut OrchestrationWorld, node: String, target: String) {
    world.repeat(
        &node,
        AgentReply::text(format!("Over to you. <next_agent>{target}</next_agent>")),
    );
}

#[given(r#""{node}" asks to locate document "{document_id}""#)]
fn asks_to_locate(world: &mut OrchestrationWorld, node: String, document_id: String) {
    world.script(
        &node,
        AgentReply::text("Locating the document.").with_invocation(CapabilityInvocation::new(
            "locate-document",
            json!({ "document_id": document_id }),
        )),
    );
}

#[given(r#""{node}" looks up section "{section}""#)]
fn looks_up_section(world: &mut OrchestrationWorld, node: String, section: String) {
    world.script(
        &node,
        AgentReply::text(format!(
            r#"<extracted_locators>["1 Introduction: 1", "2 Method: 2"]</extracted_locators> Reading {section}."#
        ))
        .with_invocation(CapabilityInvocation::new(
            "lookup-section",
            json!({ "section": section }),
        ))
        .with_artifact_reference(ArtifactReference::new(format!(
            "documents/{SEEDED_DOCUMENT}.pdf"
        ))),
    );
}

#[given(r#""{node}" requests capability "{capability}""#)]
fn requests_capability(world: &mut OrchestrationWorld, node: String, capability: String) {
    world.script(
        &node,
        AgentReply::text(format!("calling {capability}"))
            .with_invocation(CapabilityInvocation::new(capability, json!({}))),
    );
}

#[given(r#""{node}" replies "{text}""#)]
fn replies(world: &mut OrchestrationWorld, node: String, text: String) {
    world.script(&node, AgentReply::text(text));
}
