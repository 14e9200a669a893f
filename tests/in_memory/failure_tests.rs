//! Runs that fail at a node, at routing, or at the step ceiling.

use std::sync::Arc;

use super::helpers::{Cast, graph, hand_to, registry, request, topology};
use conductor::agent::domain::AgentInvocationError;
use conductor::agent::ports::AgentReply;
use conductor::capability::services::CapabilityRegistry;
use conductor::conversation::domain::{CapabilityInvocation, InvocationStatus, Message};
use conductor::graph::domain::Topology;
use conductor::graph::services::{OrchestrationError, RoutingError};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_capability_is_reported_and_the_run_continues(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: Cast::default()
            .supervisor
            .then_reply(hand_to("paper_team_leader")),
        leader: Cast::default()
            .leader
            .then_reply(request("summarise", json!({ "text": "all of it" })))
            .then_reply(AgentReply::text("No summariser available. <FINISHED>")),
        searcher: Cast::default().searcher,
    };

    let report = graph(topology, registry, &cast, 25)
        .run("summarise the paper")
        .await
        .expect("run terminates");

    let result = report
        .state
        .messages()
        .iter()
        .find(|message| message.is_capability_result())
        .expect("dispatch produced a result");
    assert_eq!(result.content(), "error: unknown capability 'summarise'");
    assert_eq!(result.invocation_status(), Some(InvocationStatus::Failed));
    assert_eq!(report.steps, 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cyclic_hand_offs_stop_at_the_step_ceiling(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: conductor::agent::adapters::ScriptedAgent::repeating(hand_to(
            "paper_team_leader",
        )),
        leader: conductor::agent::adapters::ScriptedAgent::repeating(hand_to("supervisor")),
        searcher: Cast::default().searcher,
    };

    let err = graph(topology, registry, &cast, 25)
        .run("loop forever")
        .await
        .expect_err("run never terminates");

    assert_eq!(err.steps(), 25);
    assert!(matches!(
        err.kind(),
        OrchestrationError::MaxStepsExceeded { limit: 25, current }
            if current.as_str() == "paper_team_leader"
    ));
    assert_eq!(err.state().messages().len(), 26);
    assert_eq!(err.state().count_messages(Message::is_agent), 25);
}

#[rstest]
#[case::not_an_edge("arxiv_paper_searcher")]
#[case::dispatch_without_invocations("call_tool")]
#[tokio::test(flavor = "multi_thread")]
async fn hand_off_outside_the_allow_list_halts(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
    #[case] target: &str,
) {
    let cast = Cast {
        supervisor: Cast::default().supervisor.then_reply(hand_to(target)),
        ..Cast::default()
    };

    let err = graph(topology, registry, &cast, 25)
        .run("find recent papers")
        .await
        .expect_err("hand-off is rejected");

    assert_eq!(err.steps(), 1);
    match err.kind() {
        OrchestrationError::Routing(RoutingError::NotAllowed { from, to }) => {
            assert_eq!(from.as_str(), "supervisor");
            assert_eq!(to, target);
        }
        other => panic!("expected NotAllowed, got {other:?}"),
    }
    assert_eq!(err.state().messages().len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hand_off_to_an_undeclared_node_halts(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: Cast::default().supervisor.then_reply(hand_to("reviewer")),
        ..Cast::default()
    };

    let err = graph(topology, registry, &cast, 25)
        .run("review this")
        .await
        .expect_err("hand-off is rejected");

    assert!(matches!(
        err.kind(),
        OrchestrationError::Routing(RoutingError::UnknownNode { name, .. }) if name == "reviewer"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reply_without_a_directive_halts(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: Cast::default()
            .supervisor
            .then_reply(AgentReply::text("I am not sure who should handle this.")),
        ..Cast::default()
    };

    let err = graph(topology, registry, &cast, 25)
        .run("anything")
        .await
        .expect_err("no next node");

    assert!(matches!(
        err.kind(),
        OrchestrationError::Routing(RoutingError::NoNextNode { from }) if from.as_str() == "supervisor"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_failure_aborts_with_the_state_so_far(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: Cast::default()
            .supervisor
            .then_reply(hand_to("paper_team_leader")),
        leader: Cast::default()
            .leader
            .then_fail(AgentInvocationError::MalformedResponse(
                "reply was not valid UTF-8".to_owned(),
            )),
        searcher: Cast::default().searcher,
    };

    let err = graph(topology, registry, &cast, 25)
        .run("fetch the paper")
        .await
        .expect_err("leader fails");

    assert_eq!(err.steps(), 2);
    assert!(matches!(
        err.kind(),
        OrchestrationError::AgentInvocation {
            node,
            source: AgentInvocationError::MalformedResponse(_),
        } if node.as_str() == "paper_team_leader"
    ));
    let state = err.into_state();
    assert_eq!(state.messages().len(), 2);
    assert_eq!(state.sender().as_str(), "supervisor");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_locator_list_is_reported_and_invocations_still_run(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: Cast::default()
            .supervisor
            .then_reply(hand_to("paper_team_leader")),
        leader: Cast::default()
            .leader
            .then_reply(
                AgentReply::text(
                    r#"<extracted_locators>{"2 Method": 2}</extracted_locators> Reading it."#,
                )
                .with_invocation(CapabilityInvocation::new(
                    "lookup-section",
                    json!({ "section": "2 Method" }),
                )),
            )
            .then_reply(AgentReply::text("The list was rejected. <FINISHED>")),
        searcher: Cast::default().searcher,
    };

    let report = graph(topology, registry, &cast, 25)
        .run("read the method section")
        .await
        .expect("run terminates");

    assert_eq!(report.steps, 4);
    let failures: Vec<&str> = report
        .state
        .messages()
        .iter()
        .filter(|message| message.invocation_status() == Some(InvocationStatus::Failed))
        .map(Message::content)
        .collect();
    assert_eq!(failures.len(), 2);
    assert!(
        failures
            .first()
            .is_some_and(|content| content.starts_with("error: malformed locator list"))
    );
    assert_eq!(
        failures.get(1).copied(),
        Some("error: no locator recorded for '2 Method'")
    );
    assert!(report.state.extracted_locators().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn capability_bound_to_another_node_is_refused(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast {
        supervisor: Cast::default()
            .supervisor
            .then_reply(hand_to("paper_team_leader")),
        leader: Cast::default()
            .leader
            .then_reply(hand_to("arxiv_paper_searcher"))
            .then_reply(AgentReply::text("Nothing found. <FINISHED>")),
        searcher: Cast::default()
            .searcher
            .then_reply(request("lookup-section", json!({ "section": "2 Method" })))
            .then_reply(hand_to("paper_team_leader")),
    };

    let report = graph(topology, registry, &cast, 25)
        .run("read the method section")
        .await
        .expect("run terminates");

    assert_eq!(report.steps, 6);
    let result = report
        .state
        .messages()
        .iter()
        .find(|message| message.is_capability_result())
        .expect("dispatch produced a result");
    assert_eq!(
        result.content(),
        "error: capability 'lookup-section' is not bound to node 'arxiv_paper_searcher'"
    );
}
