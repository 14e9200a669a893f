//! Shared world state for orchestration BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use conductor::agent::adapters::ScriptedAgent;
use conductor::agent::ports::AgentReply;
use conductor::capability::adapters::memory::{InMemoryDocumentLibrary, StoredDocument};
use conductor::capability::adapters::{ExtractLocators, LocateDocument, LookupSection};
use conductor::capability::services::CapabilityRegistry;
use conductor::graph::domain::{DEFAULT_MAX_STEPS, NodeKind, Topology};
use conductor::graph::services::{
    AgentBinding, GraphBuilder, OrchestrationGraph, RunError, RunReport,
};
use rstest::fixture;

/// Agent nodes of the paper team graph and the capabilities bound to each.
const AGENT_NODES: [(&str, &[&str]); 3] = [
    ("supervisor", &[]),
    (
        "paper_team_leader",
        &["locate-document", "extract-locators", "lookup-section"],
    ),
    ("arxiv_paper_searcher", &[]),
];

/// Scenario world for orchestration behaviour tests.
#[derive(Default)]
pub struct OrchestrationWorld {
    /// Graph shape under test.
    pub topology: Option<Topology>,
    /// Capabilities available to the dispatch node.
    pub registry: Arc<CapabilityRegistry>,
    /// Scripted agent per node name.
    pub agents: BTreeMap<String, ScriptedAgent>,
    /// Outcome of the last run.
    pub outcome: Option<Result<RunReport, RunError>>,
}

impl OrchestrationWorld {
    /// Appends `reply` to the script of `node`.
    pub fn script(&mut self, node: &str, reply: AgentReply) {
        let agent = self.agents.remove(node).unwrap_or_default();
        self.agents.insert(node.to_owned(), agent.then_reply(reply));
    }

    /// Makes `node` answer every request with `reply`.
    pub fn repeat(&mut self, node: &str, reply: AgentReply) {
        self.agents
            .insert(node.to_owned(), ScriptedAgent::repeating(reply));
    }

    /// Builds the graph from the scripted agents.
    pub fn graph(&self) -> Result<OrchestrationGraph, eyre::Report> {
        let topology = self
            .topology
            .clone()
            .ok_or_else(|| eyre::eyre!("graph has not been declared"))?;
        let builder = AGENT_NODES.iter().fold(
            GraphBuilder::new(topology, Arc::clone(&self.registry))
                .with_max_steps(DEFAULT_MAX_STEPS),
            |builder, (node, capabilities)| {
                let agent = self.agents.get(*node).cloned().unwrap_or_default();
                builder.bind(
                    AgentBinding::new(*node, Arc::new(agent))
                        .with_capabilities(capabilities.iter().copied()),
                )
            },
        );
        builder
            .build()
            .map_err(|err| eyre::eyre!("graph build failed: {err}"))
    }

    /// Returns the successful run report.
    pub fn report(&self) -> Result<&RunReport, eyre::Report> {
        match self.outcome.as_ref() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre::eyre!("run failed: {err}")),
            None => Err(eyre::eyre!("no run has been performed")),
        }
    }

    /// Returns the run failure.
    pub fn failure(&self) -> Result<&RunError, eyre::Report> {
        match self.outcome.as_ref() {
            Some(Err(err)) => Ok(err),
            Some(Ok(report)) => Err(eyre::eyre!(
                "expected a failed run, terminated after {} steps",
                report.steps
            )),
            None => Err(eyre::eyre!("no run has been performed")),
        }
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> OrchestrationWorld {
    OrchestrationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// The supervisor, paper team leader, searcher worker and dispatch node.
pub fn paper_team() -> Result<Topology, eyre::Report> {
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
        .entry("supervisor")
        .build()
        .map_err(|err| eyre::eyre!("invalid topology: {err}"))
}

/// A registry over a library holding one four-page document.
pub fn document_registry(document_id: &str) -> Result<CapabilityRegistry, eyre::Report> {
    let library = InMemoryDocumentLibrary::new();
    library
        .add_document(
            StoredDocument::new(document_id, "Graph Routing for Agents")
                .with_page("title page")
                .with_page("introduction")
                .with_page("method part one")
                .with_page("method part two")
                .with_section("1 Introduction", 1)
                .with_section("2 Method", 2),
        )
        .map_err(|err| eyre::eyre!("seeding library failed: {err}"))?;
    let shared = Arc::new(library);
    let locate = LocateDocument::new(Arc::clone(&shared))?;
    let extract = ExtractLocators::new(Arc::clone(&shared))?;
    let lookup = LookupSection::new(shared)?;
    let registry = CapabilityRegistry::new()
        .with_capability(locate)?
        .with_capability(extract)?
        .with_capability(lookup)?;
    Ok(registry)
}
