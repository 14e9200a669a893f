//! Transient agent failures absorbed by the retry decorator.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{hand_to, registry, topology};
use conductor::agent::adapters::{RetryPolicy, RetryingAgent, ScriptedAgent};
use conductor::agent::domain::AgentInvocationError;
use conductor::agent::ports::AgentReply;
use conductor::capability::services::CapabilityRegistry;
use conductor::graph::domain::Topology;
use conductor::graph::services::{GraphBuilder, OrchestrationError, OrchestrationGraph};
use rstest::rstest;

const QUICK: RetryPolicy = RetryPolicy {
    max_attempts: 3,
    initial_backoff: Duration::from_millis(1),
};

fn retrying_graph(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
    supervisor: &ScriptedAgent,
    leader: &ScriptedAgent,
) -> OrchestrationGraph {
    GraphBuilder::new(topology, registry)
        .agent(
            "supervisor",
            Arc::new(RetryingAgent::new(supervisor.clone(), QUICK)),
        )
        .agent(
            "paper_team_leader",
            Arc::new(RetryingAgent::new(leader.clone(), QUICK)),
        )
        .agent("arxiv_paper_searcher", Arc::new(ScriptedAgent::new()))
        .build()
        .expect("valid graph")
}

fn outage() -> AgentInvocationError {
    AgentInvocationError::Unavailable("backend overloaded".to_owned())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transient_outages_are_retried(topology: Topology, registry: Arc<CapabilityRegistry>) {
    let supervisor = ScriptedAgent::new()
        .then_fail(outage())
        .then_reply(hand_to("paper_team_leader"));
    let leader = ScriptedAgent::new()
        .then_fail(outage())
        .then_fail(outage())
        .then_reply(AgentReply::text("Nothing to fetch. <FINISHED>"));

    let report = retrying_graph(topology, registry, &supervisor, &leader)
        .run("hello")
        .await
        .expect("run recovers");

    assert_eq!(report.steps, 2);
    assert_eq!(supervisor.requests().len(), 2);
    assert_eq!(leader.requests().len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn persistent_outage_exhausts_the_retries(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let supervisor = ScriptedAgent::new();
    let leader = ScriptedAgent::new();

    let err = retrying_graph(topology, registry, &supervisor, &leader)
        .run("hello")
        .await
        .expect_err("supervisor never answers");

    assert!(matches!(
        err.kind(),
        OrchestrationError::AgentInvocation {
            source: AgentInvocationError::Unavailable(_),
            ..
        }
    ));
    assert_eq!(supervisor.requests().len(), 3);
    assert!(leader.requests().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_replies_are_not_retried(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let supervisor = ScriptedAgent::new()
        .then_reply(AgentReply::text("   "))
        .then_reply(hand_to("paper_team_leader"));
    let leader = ScriptedAgent::new();

    let err = retrying_graph(topology, registry, &supervisor, &leader)
        .run("hello")
        .await
        .expect_err("blank reply is malformed");

    assert!(matches!(
        err.kind(),
        OrchestrationError::AgentInvocation {
            source: AgentInvocationError::MalformedResponse(_),
            ..
        }
    ));
    assert_eq!(supervisor.requests().len(), 1);
    assert_eq!(supervisor.remaining(), 1);
}
