//! Delegated document lookup from request to terminated summary.

use std::sync::Arc;

use super::helpers::{
    Cast, DOCUMENT_ARTIFACT, DOCUMENT_ID, hand_to, look_up, registry, request, topology,
};
use conductor::agent::ports::AgentReply;
use conductor::capability::services::CapabilityRegistry;
use conductor::conversation::domain::{CapabilityInvocation, InvocationStatus, Message};
use conductor::graph::domain::{NodeName, Topology};
use rstest::rstest;
use serde_json::{Value, json};

fn scripted_lookup() -> Cast {
    let cast = Cast::default();
    let supervisor = cast.supervisor.then_reply(hand_to("paper_team_leader"));
    let leader = cast
        .leader
        .then_reply(request("locate-document", json!({ "document_id": DOCUMENT_ID })))
        .then_reply(look_up("2 Method"))
        .then_reply(AgentReply::text(
            "The method splits routing into directives and an allow-list. <FINISHED>",
        ));
    Cast {
        supervisor,
        leader,
        searcher: cast.searcher,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn document_request_runs_to_termination(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = scripted_lookup();
    let graph = super::helpers::graph(topology, registry, &cast, 25);

    let report = graph
        .run(format!("fetch document {DOCUMENT_ID} and summarize its second section"))
        .await
        .expect("run terminates");

    let trail: Vec<&str> = report.visited.iter().map(NodeName::as_str).collect();
    assert_eq!(
        trail,
        [
            "supervisor",
            "paper_team_leader",
            "call_tool",
            "paper_team_leader",
            "call_tool",
            "paper_team_leader",
        ]
    );
    let state = &report.state;
    assert_eq!(state.count_messages(Message::is_user), 1);
    assert_eq!(state.count_messages(Message::is_agent), 4);
    assert_eq!(state.count_messages(Message::is_capability_result), 2);
    assert!(
        state
            .last_message()
            .is_some_and(|message| message.content().ends_with("<FINISHED>"))
    );
    assert_eq!(state.sender().as_str(), "paper_team_leader");
    assert_eq!(state.extracted_locators().get("2 Method"), Some("2"));
    assert_eq!(
        state.artifact_reference().map(|reference| reference.as_str()),
        Some(DOCUMENT_ARTIFACT)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn capability_results_reach_the_requesting_leader(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = scripted_lookup();
    let graph = super::helpers::graph(topology, registry, &cast, 25);

    let report = graph.run("summarise section two").await.expect("run terminates");

    let results: Vec<&Message> = report
        .state
        .messages()
        .iter()
        .filter(|message| message.is_capability_result())
        .collect();
    assert!(
        results
            .iter()
            .all(|message| message.invocation_status() == Some(InvocationStatus::Succeeded))
    );
    let located: Value = serde_json::from_str(
        results.first().map(|message| message.content()).unwrap_or_default(),
    )
    .expect("locate-document returns JSON");
    assert_eq!(located["artifact"], DOCUMENT_ARTIFACT);
    assert_eq!(located["locators"]["2 Method"], "2");
    assert_eq!(
        results.get(1).map(|message| message.content()),
        Some("introduction\nmethod part one\nmethod part two")
    );

    let requests = cast.leader.requests();
    assert_eq!(requests.len(), 3);
    let second = requests.get(1).expect("second leader turn");
    assert!(
        second
            .messages
            .last()
            .is_some_and(Message::is_capability_result)
    );
    assert_eq!(second.allowed_next, ["arxiv_paper_searcher", "call_tool", "supervisor"]);
    assert_eq!(second.capabilities.len(), 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_invocations_beat_termination(
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
) {
    let cast = Cast::default();
    let supervisor = cast.supervisor.then_reply(hand_to("paper_team_leader"));
    let leader = cast
        .leader
        .then_reply(
            AgentReply::text("Locating it now. <FINISHED>").with_invocation(
                CapabilityInvocation::new("locate-document", json!({ "document_id": DOCUMENT_ID })),
            ),
        )
        .then_reply(AgentReply::text("Located. <FINISHED>"));
    let cast = Cast {
        supervisor,
        leader,
        searcher: cast.searcher,
    };
    let graph = super::helpers::graph(topology, registry, &cast, 25);

    let report = graph.run("where is the paper?").await.expect("run terminates");

    assert_eq!(report.steps, 4);
    assert_eq!(
        report.state.count_messages(Message::is_capability_result),
        1
    );
    assert_eq!(cast.leader.remaining(), 0);
}
