//! Static registry of capabilities keyed by name.

use crate::capability::domain::{CapabilityDefinition, CapabilityDomainError, CapabilityName};
use crate::capability::ports::Capability;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while registering capabilities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityRegistryError {
    /// The capability's definition failed validation.
    #[error(transparent)]
    InvalidDefinition(#[from] CapabilityDomainError),

    /// A capability with the same name is already registered.
    #[error("capability '{0}' is already registered")]
    Duplicate(CapabilityName),
}

/// Registry of capabilities, built once at startup and shared by `Arc`.
///
/// Definitions are validated on registration so dispatch never sees a
/// malformed schema.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: HashMap<CapabilityName, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityRegistryError::InvalidDefinition`] when the schema
    /// is invalid, or [`CapabilityRegistryError::Duplicate`] when the name is
    /// already taken.
    pub fn register(
        &mut self,
        capability: Arc<dyn Capability>,
    ) -> Result<(), CapabilityRegistryError> {
        let definition = capability.definition();
        definition.validate_schema()?;
        let name = definition.name().clone();
        if self.capabilities.contains_key(&name) {
            return Err(CapabilityRegistryError::Duplicate(name));
        }
        tracing::debug!(capability = %name, "registered capability");
        self.capabilities.insert(name, capability);
        Ok(())
    }

    /// Registers a capability and returns the registry.
    ///
    /// # Errors
    ///
    /// See [`Self::register`].
    pub fn with_capability(
        mut self,
        capability: impl Capability + 'static,
    ) -> Result<Self, CapabilityRegistryError> {
        self.register(Arc::new(capability))?;
        Ok(self)
    }

    /// Looks up a capability by its raw requested name.
    ///
    /// Names are normalised the same way as at registration, so a request
    /// for `" Lookup-Section "` finds `lookup-section`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Capability>> {
        CapabilityName::new(name)
            .ok()
            .and_then(|key| self.capabilities.get(&key))
    }

    /// Returns the definition of a registered capability.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&CapabilityDefinition> {
        self.find(name).map(|capability| capability.definition())
    }

    /// Returns `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Returns registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&CapabilityName> {
        let mut names: Vec<_> = self.capabilities.keys().collect();
        names.sort();
        names
    }

    /// Returns the number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("capabilities", &self.names())
            .finish()
    }
}
