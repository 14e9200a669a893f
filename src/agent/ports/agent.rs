//! The agent invocation port.

use crate::agent::domain::AgentInvocationError;
use crate::capability::domain::CapabilityDefinition;
use crate::conversation::domain::{
    ArtifactReference, CapabilityInvocation, LocatorMap, Message,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for agent invocations.
pub type AgentResult<T> = Result<T, AgentInvocationError>;

/// Everything an agent sees for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRequest {
    /// Node the agent is bound to.
    pub node: String,
    /// Rendered instructions for the node.
    pub instructions: String,
    /// Nodes the agent may name in a next-node directive.
    pub allowed_next: Vec<String>,
    /// Capabilities the agent may request.
    pub capabilities: Vec<CapabilityDefinition>,
    /// The conversation so far.
    pub messages: Vec<Message>,
    /// Locators discovered earlier in the run.
    pub extracted_locators: LocatorMap,
    /// Artifact produced earlier in the run, if any.
    pub artifact_reference: Option<ArtifactReference>,
}

/// An agent's turn.
///
/// `content` may embed directives. `pending_invocations` are structured
/// capability requests and are kept separate from the text protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentReply {
    /// Free-text content.
    pub content: String,
    /// Capability requests, in the order they must run.
    #[serde(default)]
    pub pending_invocations: Vec<CapabilityInvocation>,
    /// Reference to an external artifact the agent produced or adopted.
    #[serde(default)]
    pub artifact_reference: Option<ArtifactReference>,
}

impl AgentReply {
    /// Creates a plain text reply.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Adds a capability request.
    #[must_use]
    pub fn with_invocation(mut self, invocation: CapabilityInvocation) -> Self {
        self.pending_invocations.push(invocation);
        self
    }

    /// Attaches an artifact reference.
    #[must_use]
    pub fn with_artifact_reference(mut self, reference: ArtifactReference) -> Self {
        self.artifact_reference = Some(reference);
        self
    }

    /// Returns `true` when the reply has neither text nor requests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.pending_invocations.is_empty()
    }
}

/// An LLM-backed agent.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Produces one turn for the given request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentInvocationError`] when the backend is unavailable,
    /// answers with something unusable, or fails otherwise.
    async fn invoke(&self, request: &AgentRequest) -> AgentResult<AgentReply>;
}
