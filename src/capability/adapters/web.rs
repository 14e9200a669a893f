//! Web search capability.

use super::string_argument;
use crate::capability::domain::{
    ArgumentSpec, ArgumentType, CapabilityDefinition, CapabilityDomainError,
    CapabilityInvocationError, CapabilityName, InjectedState,
};
use crate::capability::ports::{Capability, CapabilityResult, WebSearch};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Answers general questions through a [`WebSearch`] collaborator.
pub struct WebSearchCapability<W: WebSearch> {
    search: Arc<W>,
    definition: CapabilityDefinition,
}

impl<W: WebSearch> WebSearchCapability<W> {
    /// Creates the capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] if the built-in name is rejected.
    pub fn new(search: Arc<W>) -> Result<Self, CapabilityDomainError> {
        let definition = CapabilityDefinition::new(
            CapabilityName::new("web-search")?,
            "Search the web and summarise the results.",
        )
        .with_argument(
            ArgumentSpec::required("query", ArgumentType::String)
                .with_description("Free-text search query."),
        );
        Ok(Self { search, definition })
    }
}

#[async_trait]
impl<W: WebSearch> Capability for WebSearchCapability<W> {
    fn definition(&self) -> &CapabilityDefinition {
        &self.definition
    }

    async fn invoke(
        &self,
        arguments: &Map<String, Value>,
        _injected: &InjectedState,
    ) -> CapabilityResult<Value> {
        let query = string_argument(&self.definition, arguments, "query")?;
        let summary = self
            .search
            .search(query)
            .await
            .map_err(|err| CapabilityInvocationError::failed(self.definition.name().as_str(), err))?;
        Ok(Value::String(summary))
    }
}
