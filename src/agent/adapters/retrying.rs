//! Bounded retry around any agent.

use crate::agent::ports::{Agent, AgentReply, AgentRequest, AgentResult};
use async_trait::async_trait;
use std::time::Duration;

/// How often and how patiently to re-attempt transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Delay before the first re-attempt; doubles on each further one.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

/// Decorates an agent with retries for
/// [`AgentInvocationError::Unavailable`](crate::agent::domain::AgentInvocationError::Unavailable).
///
/// Other failures are returned immediately. The node adapter stays
/// retry-free; this wrapper is applied when agents are bound.
#[derive(Debug, Clone)]
pub struct RetryingAgent<A: Agent> {
    inner: A,
    policy: RetryPolicy,
}

impl<A: Agent> RetryingAgent<A> {
    /// Wraps `inner` with `policy`.
    #[must_use]
    pub const fn new(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the wrapped agent.
    #[must_use]
    pub const fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: Agent> Agent for RetryingAgent<A> {
    async fn invoke(&self, request: &AgentRequest) -> AgentResult<AgentReply> {
        let attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.initial_backoff;
        let mut attempt = 1;
        loop {
            match self.inner.invoke(request).await {
                Err(err) if err.is_transient() && attempt < attempts => {
                    tracing::warn!(
                        node = %request.node,
                        attempt,
                        error = %err,
                        "agent unavailable, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }
}
