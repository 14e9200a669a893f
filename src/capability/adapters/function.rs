//! Closure-backed capabilities.

use crate::capability::domain::{CapabilityDefinition, InjectedState};
use crate::capability::ports::{Capability, CapabilityResult};
use async_trait::async_trait;
use serde_json::{Map, Value};

type Handler =
    dyn Fn(&Map<String, Value>, &InjectedState) -> CapabilityResult<Value> + Send + Sync;

/// A capability whose behaviour is a synchronous closure.
///
/// Useful for small local operations and for wiring deterministic graphs.
pub struct FunctionCapability {
    definition: CapabilityDefinition,
    handler: Box<Handler>,
}

impl FunctionCapability {
    /// Creates a capability from a definition and handler.
    #[must_use]
    pub fn new<F>(definition: CapabilityDefinition, handler: F) -> Self
    where
        F: Fn(&Map<String, Value>, &InjectedState) -> CapabilityResult<Value>
            + Send
            + Sync
            + 'static,
    {
        Self {
            definition,
            handler: Box::new(handler),
        }
    }
}

impl std::fmt::Debug for FunctionCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCapability")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Capability for FunctionCapability {
    fn definition(&self) -> &CapabilityDefinition {
        &self.definition
    }

    async fn invoke(
        &self,
        arguments: &Map<String, Value>,
        injected: &InjectedState,
    ) -> CapabilityResult<Value> {
        (self.handler)(arguments, injected)
    }
}
