//! The Capability Dispatch Node.

use super::CapabilityRegistry;
use crate::capability::domain::{CapabilityInvocationError, CapabilityName, InjectedState};
use crate::conversation::domain::{
    CapabilityInvocation, ConversationState, InvocationStatus, Message, NextRoleUpdate,
    StateDelta,
};
use crate::graph::domain::NodeName;
use mockable::Clock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Executes the pending invocations of the most recent message.
///
/// Invocations run sequentially in request order and each produces exactly
/// one capability-result message. Failures become error-content results and
/// never abort the batch. The returned delta leaves `sender` untouched so
/// control returns to the requesting node, and clears `next_role`.
///
/// Once bindings are set, a node may only run the capabilities bound to it;
/// any other registered name fails as [`CapabilityInvocationError::NotBound`].
#[derive(Debug, Clone)]
pub struct CapabilityDispatchNode {
    name: NodeName,
    registry: Arc<CapabilityRegistry>,
    bindings: Option<BTreeMap<NodeName, Vec<CapabilityName>>>,
}

impl CapabilityDispatchNode {
    /// Creates a dispatch node backed by `registry` that accepts requests
    /// for any registered capability.
    #[must_use]
    pub const fn new(name: NodeName, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            name,
            registry,
            bindings: None,
        }
    }

    /// Restricts each requesting node to its bound capabilities. Nodes
    /// missing from `bindings` may run none.
    #[must_use]
    pub fn with_bindings(mut self, bindings: BTreeMap<NodeName, Vec<CapabilityName>>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Returns the node name.
    #[must_use]
    pub const fn name(&self) -> &NodeName {
        &self.name
    }

    /// Returns the registry this node resolves capabilities against.
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Runs every pending invocation on the last message.
    pub async fn execute(&self, state: &ConversationState, clock: &impl Clock) -> StateDelta {
        let mut delta = StateDelta::new().with_next_role(NextRoleUpdate::Clear);
        let Some(last) = state.last_message() else {
            return delta;
        };

        for invocation in last.pending_invocations() {
            let message = match self.invoke(invocation, state).await {
                Ok(value) => Message::capability_result(
                    invocation,
                    InvocationStatus::Succeeded,
                    render(value),
                    clock,
                ),
                Err(err) => {
                    tracing::warn!(
                        node = %self.name,
                        capability = invocation.capability(),
                        call_id = invocation.call_id(),
                        error = %err,
                        "capability invocation failed"
                    );
                    Message::capability_result(
                        invocation,
                        InvocationStatus::Failed,
                        format!("error: {err}"),
                        clock,
                    )
                }
            };
            delta = delta.with_message(message);
        }
        delta
    }

    async fn invoke(
        &self,
        invocation: &CapabilityInvocation,
        state: &ConversationState,
    ) -> Result<Value, CapabilityInvocationError> {
        let capability = self.registry.find(invocation.capability()).ok_or_else(|| {
            CapabilityInvocationError::UnknownCapability(invocation.capability().to_owned())
        })?;
        let definition = capability.definition();
        let requester = state.sender();
        if !self.is_bound(requester, definition.name()) {
            return Err(CapabilityInvocationError::NotBound {
                capability: definition.name().to_string(),
                node: requester.to_string(),
            });
        }
        definition.validate_arguments(invocation.arguments())?;
        let injected = InjectedState::resolve(definition, state);
        tracing::debug!(
            node = %self.name,
            capability = %definition.name(),
            call_id = invocation.call_id(),
            "invoking capability"
        );
        capability.invoke(invocation.arguments(), &injected).await
    }

    fn is_bound(&self, node: &NodeName, capability: &CapabilityName) -> bool {
        self.bindings.as_ref().is_none_or(|bindings| {
            bindings
                .get(node)
                .is_some_and(|names| names.contains(capability))
        })
    }
}

fn render(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
