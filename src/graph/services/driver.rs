//! The orchestration graph and its driver loop.

use super::{Route, Router, RoutingError};
use crate::agent::domain::AgentInvocationError;
use crate::agent::services::AgentNode;
use crate::capability::services::CapabilityDispatchNode;
use crate::conversation::domain::{ConversationState, StateDelta};
use crate::graph::domain::{NodeName, Topology};
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Reasons a run aborts.
#[derive(Debug, Clone, Error)]
pub enum OrchestrationError {
    /// The router could not pick a legal next node.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// An agent invocation failed.
    #[error("agent node '{node}' failed: {source}")]
    AgentInvocation {
        /// Node whose agent failed.
        node: NodeName,
        /// Underlying failure.
        source: AgentInvocationError,
    },

    /// The step ceiling was reached before the run terminated.
    #[error("step limit of {limit} reached before '{current}' could run")]
    MaxStepsExceeded {
        /// Configured ceiling.
        limit: usize,
        /// Node the router chose next.
        current: NodeName,
    },
}

/// A failed run: what went wrong and the state it left behind.
#[derive(Debug, Clone, Error)]
#[error("run aborted after {steps} steps: {kind}")]
pub struct RunError {
    #[source]
    kind: OrchestrationError,
    state: Box<ConversationState>,
    steps: usize,
}

impl RunError {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &OrchestrationError {
        &self.kind
    }

    /// Returns the state as it stood when the run halted.
    #[must_use]
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Returns the number of node executions performed.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Consumes the error and returns the halted state.
    #[must_use]
    pub fn into_state(self) -> ConversationState {
        *self.state
    }
}

/// A completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Final conversation state.
    pub state: ConversationState,
    /// Number of node executions.
    pub steps: usize,
    /// Nodes in execution order.
    pub visited: Vec<NodeName>,
}

/// A validated graph of agent nodes around one Capability Dispatch Node.
///
/// Built with [`super::GraphBuilder`]. Runs are independent: each call to
/// [`OrchestrationGraph::run`] starts a fresh conversation, and one node
/// executes at a time.
#[derive(Debug, Clone)]
pub struct OrchestrationGraph<C: Clock + Send + Sync = DefaultClock> {
    topology: Arc<Topology>,
    router: Router,
    agents: BTreeMap<NodeName, AgentNode>,
    dispatch: CapabilityDispatchNode,
    max_steps: usize,
    clock: Arc<C>,
}

impl<C: Clock + Send + Sync> OrchestrationGraph<C> {
    pub(super) const fn new(
        router: Router,
        topology: Arc<Topology>,
        agents: BTreeMap<NodeName, AgentNode>,
        dispatch: CapabilityDispatchNode,
        max_steps: usize,
        clock: Arc<C>,
    ) -> Self {
        Self {
            topology,
            router,
            agents,
            dispatch,
            max_steps,
            clock,
        }
    }

    /// Returns the topology.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Returns the step ceiling.
    #[must_use]
    pub const fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the agent bound to `name`.
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<&AgentNode> {
        self.topology
            .resolve(name)
            .and_then(|node| self.agents.get(node))
    }

    /// Runs the graph from the entry node until it terminates.
    ///
    /// At most `max_steps` nodes execute. A Terminate decision after the
    /// last permitted step still succeeds; any other route out of that step
    /// fails with [`OrchestrationError::MaxStepsExceeded`] instead of running a
    /// further node.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when routing fails, an agent invocation fails,
    /// or the step ceiling is reached. The error carries the halted state.
    pub async fn run(&self, request: impl Into<String>) -> Result<RunReport, RunError> {
        let entry = self.topology.entry().clone();
        let mut state = ConversationState::start(entry.clone(), request, &*self.clock);
        let mut current = entry;
        let mut visited = Vec::new();
        tracing::info!(
            run_id = %state.run_id(),
            entry = %current,
            max_steps = self.max_steps,
            "orchestration run started"
        );

        loop {
            visited.push(current.clone());
            let steps = visited.len();
            let delta = match self.execute(&current, &state).await {
                Ok(delta) => delta,
                Err(kind) => return Err(abort(kind, state, steps)),
            };
            state.apply(delta);

            let route = match self.router.route(&current, &state) {
                Ok(route) => route,
                Err(err) => return Err(abort(err.into(), state, steps)),
            };
            tracing::debug!(
                run_id = %state.run_id(),
                step = steps,
                node = %current,
                route = %route,
                messages = state.messages().len(),
                "step completed"
            );

            match route {
                Route::Terminate => {
                    tracing::info!(
                        run_id = %state.run_id(),
                        steps,
                        messages = state.messages().len(),
                        "orchestration run terminated"
                    );
                    return Ok(RunReport {
                        state,
                        steps,
                        visited,
                    });
                }
                Route::Node(next) if steps >= self.max_steps => {
                    let kind = OrchestrationError::MaxStepsExceeded {
                        limit: self.max_steps,
                        current: next,
                    };
                    return Err(abort(kind, state, steps));
                }
                Route::Node(next) => current = next,
            }
        }
    }

    async fn execute(
        &self,
        current: &NodeName,
        state: &ConversationState,
    ) -> Result<StateDelta, OrchestrationError> {
        if current == self.dispatch.name() {
            return Ok(self.dispatch.execute(state, &*self.clock).await);
        }
        let agent = self
            .agents
            .get(current)
            .ok_or_else(|| RoutingError::UnknownNode {
                from: state.sender().clone(),
                name: current.to_string(),
            })?;
        agent
            .execute(state, &*self.clock)
            .await
            .map_err(|source| OrchestrationError::AgentInvocation {
                node: current.clone(),
                source,
            })
    }
}

fn abort(kind: OrchestrationError, state: ConversationState, steps: usize) -> RunError {
    tracing::error!(
        run_id = %state.run_id(),
        steps,
        error = %kind,
        "orchestration run aborted"
    );
    RunError {
        kind,
        state: Box::new(state),
        steps,
    }
}
