//! Scripted in-memory agent.

use crate::agent::domain::AgentInvocationError;
use crate::agent::ports::{Agent, AgentReply, AgentRequest, AgentResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Agent that plays back a fixed sequence of outcomes.
///
/// Once the script is exhausted the agent either repeats its final outcome
/// (see [`ScriptedAgent::repeating`]) or reports itself unavailable. Every
/// request is recorded for later inspection. Clones share the same script.
///
/// If a holder of the script panics, later script edits are still kept but
/// every invocation fails with [`AgentInvocationError::Backend`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgent {
    state: Arc<Mutex<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    outcomes: VecDeque<AgentResult<AgentReply>>,
    fallback: Option<AgentReply>,
    requests: Vec<AgentRequest>,
}

impl ScriptedAgent {
    /// Creates an agent with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an agent that answers every request with `reply`.
    #[must_use]
    pub fn repeating(reply: AgentReply) -> Self {
        let agent = Self::new();
        agent.script().fallback = Some(reply);
        agent
    }

    /// Appends a reply to the script.
    #[must_use]
    pub fn then_reply(self, reply: AgentReply) -> Self {
        self.push(Ok(reply));
        self
    }

    /// Appends a failure to the script.
    #[must_use]
    pub fn then_fail(self, error: AgentInvocationError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, outcome: AgentResult<AgentReply>) {
        self.script().outcomes.push_back(outcome);
    }

    fn script(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.script().requests.clone()
    }

    /// Returns the number of scripted outcomes not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script().outcomes.len()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn invoke(&self, request: &AgentRequest) -> AgentResult<AgentReply> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| AgentInvocationError::backend(std::io::Error::other(err.to_string())))?;
        state.requests.push(request.clone());
        match state.outcomes.pop_front() {
            Some(outcome) => outcome,
            None => state.fallback.clone().ok_or_else(|| {
                AgentInvocationError::Unavailable(format!(
                    "script for '{}' is exhausted",
                    request.node
                ))
            }),
        }
    }
}
