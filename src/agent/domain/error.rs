//! Agent error types.

use std::sync::Arc;
use thiserror::Error;

/// A failed agent invocation. Always fatal to the run.
#[derive(Debug, Clone, Error)]
pub enum AgentInvocationError {
    /// The agent backend could not be reached.
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    /// The agent answered with something that is not a usable turn.
    #[error("malformed agent response: {0}")]
    MalformedResponse(String),

    /// Any other backend failure.
    #[error("agent backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentInvocationError {
    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Returns `true` for failures an outer retry layer may re-attempt.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// An instruction template that could not be rendered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render instructions for node '{node}': {reason}")]
pub struct InstructionError {
    /// Node whose template failed.
    pub node: String,
    /// Renderer diagnostic.
    pub reason: String,
}
