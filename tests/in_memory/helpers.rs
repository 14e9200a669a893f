//! Shared fixtures for in-memory orchestration runs.

use std::sync::Arc;

use conductor::agent::adapters::ScriptedAgent;
use conductor::agent::ports::AgentReply;
use conductor::capability::adapters::memory::{
    InMemoryDocumentLibrary, InMemoryWebSearch, StoredDocument,
};
use conductor::capability::adapters::{
    ExtractLocators, LocateDocument, LookupSection, RecentDocuments, WebSearchCapability,
};
use conductor::capability::services::CapabilityRegistry;
use conductor::conversation::domain::{ArtifactReference, CapabilityInvocation};
use conductor::graph::domain::{NodeKind, Topology};
use conductor::graph::services::{AgentBinding, GraphBuilder, OrchestrationGraph};
use rstest::fixture;
use serde_json::json;

/// Identifier of the seeded document.
pub const DOCUMENT_ID: &str = "2401.00001";

/// Artifact reference the in-memory library assigns to the seeded document.
pub const DOCUMENT_ARTIFACT: &str = "documents/2401.00001.pdf";

/// Provides a library seeded with one five-page document.
#[fixture]
pub fn library() -> Arc<InMemoryDocumentLibrary> {
    let library = InMemoryDocumentLibrary::new();
    library
        .add_document(
            StoredDocument::new(DOCUMENT_ID, "Graph Routing for Agents")
                .with_summary("Routing between cooperating agents.")
                .in_domain("cs.ai")
                .with_page("title page")
                .with_page("introduction")
                .with_page("method part one")
                .with_page("method part two")
                .with_page("results")
                .with_section("1 Introduction", 1)
                .with_section("2 Method", 2)
                .with_section("3 Results", 4),
        )
        .expect("document stored");
    Arc::new(library)
}

/// Provides a registry with every collaborator-backed capability.
#[fixture]
pub fn registry(library: Arc<InMemoryDocumentLibrary>) -> Arc<CapabilityRegistry> {
    let search = Arc::new(InMemoryWebSearch::new());
    let registry = CapabilityRegistry::new()
        .with_capability(LocateDocument::new(Arc::clone(&library)).expect("valid capability"))
        .and_then(|registry| {
            registry.with_capability(
                ExtractLocators::new(Arc::clone(&library)).expect("valid capability"),
            )
        })
        .and_then(|registry| {
            registry.with_capability(
                LookupSection::new(Arc::clone(&library)).expect("valid capability"),
            )
        })
        .and_then(|registry| {
            registry.with_capability(
                RecentDocuments::new(Arc::clone(&library)).expect("valid capability"),
            )
        })
        .and_then(|registry| {
            registry.with_capability(WebSearchCapability::new(search).expect("valid capability"))
        })
        .expect("registration succeeds");
    Arc::new(registry)
}

/// Supervisor, paper team leader, searcher worker and the dispatch node.
#[fixture]
pub fn topology() -> Topology {
    Topology::builder()
        .node("supervisor", NodeKind::Supervisor)
        .node("paper_team_leader", NodeKind::TeamLeader)
        .node("arxiv_paper_searcher", NodeKind::Worker)
        .node("call_tool", NodeKind::Dispatch)
        .edge("supervisor", "paper_team_leader")
        .edge("paper_team_leader", "supervisor")
        .edge("paper_team_leader", "arxiv_paper_searcher")
        .edge("paper_team_leader", "call_tool")
        .edge("arxiv_paper_searcher", "paper_team_leader")
        .edge("arxiv_paper_searcher", "call_tool")
        .entry("supervisor")
        .build()
        .expect("valid topology")
}

/// Scripted agents for every agent node.
#[derive(Debug, Clone, Default)]
pub struct Cast {
    pub supervisor: ScriptedAgent,
    pub leader: ScriptedAgent,
    pub searcher: ScriptedAgent,
}

/// Builds a graph over the given agents.
pub fn graph(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
    cast: &Cast,
    max_steps: usize,
) -> OrchestrationGraph {
    GraphBuilder::new(topology, registry)
        .with_max_steps(max_steps)
        .agent("supervisor", Arc::new(cast.supervisor.clone()))
        .bind(
            AgentBinding::new("paper_team_leader", Arc::new(cast.leader.clone()))
                .with_capabilities(["locate-document", "extract-locators", "lookup-section"]),
        )
        .bind(
            AgentBinding::new("arxiv_paper_searcher", Arc::new(cast.searcher.clone()))
                .with_capabilities(["recent-documents", "web-search"]),
        )
        .build()
        .expect("valid graph")
}

/// A reply naming the next node.
pub fn hand_to(node: &str) -> AgentReply {
    AgentReply::text(format!("<next_agent>{node}</next_agent>"))
}

/// A reply requesting one capability.
pub fn request(capability: &str, arguments: serde_json::Value) -> AgentReply {
    AgentReply::text(format!("calling {capability}"))
        .with_invocation(CapabilityInvocation::new(capability, arguments))
}

/// The leader's turn after locating the document: restate the locators,
/// adopt the artifact and look up one section.
pub fn look_up(section: &str) -> AgentReply {
    AgentReply::text(format!(
        r#"Sections found. <extracted_locators>["1 Introduction: 1", "2 Method: 2", "3 Results: 4"]</extracted_locators> Reading {section}."#
    ))
    .with_invocation(CapabilityInvocation::new(
        "lookup-section",
        json!({ "section": section }),
    ))
    .with_artifact_reference(ArtifactReference::new(DOCUMENT_ARTIFACT))
}
