//! The capability invocation port.

use crate::capability::domain::{CapabilityDefinition, CapabilityInvocationError, InjectedState};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Result type for capability invocations.
pub type CapabilityResult<T> = Result<T, CapabilityInvocationError>;

/// A callable, named operation consumed by the orchestration core.
///
/// Implementations receive arguments that already passed schema validation
/// and only the state slices their definition declares. They must not reach
/// into any other state.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Returns the capability's name, schema and injection declaration.
    fn definition(&self) -> &CapabilityDefinition;

    /// Runs the capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityInvocationError`] when the capability cannot
    /// produce a result; the dispatch node records the error as an
    /// error-content message.
    async fn invoke(
        &self,
        arguments: &Map<String, Value>,
        injected: &InjectedState,
    ) -> CapabilityResult<Value>;
}
