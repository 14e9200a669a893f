//! State slices injected into capability calls.

use super::{CapabilityDefinition, CapabilityInvocationError};
use crate::conversation::domain::{ArtifactReference, ConversationState, LocatorMap};
use serde::{Deserialize, Serialize};

/// A read-only part of the conversation state a capability may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateSlice {
    /// The `extracted_locators` map.
    ExtractedLocators,
    /// The `artifact_reference` value.
    ArtifactReference,
}

impl StateSlice {
    /// Returns the canonical name of the slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtractedLocators => "extracted_locators",
            Self::ArtifactReference => "artifact_reference",
        }
    }
}

/// The state a capability declared it needs, resolved by the dispatch node.
///
/// Slices the capability did not declare are never populated, so a
/// capability cannot read state it did not ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectedState {
    capability: String,
    extracted_locators: Option<LocatorMap>,
    artifact_reference: Option<ArtifactReference>,
}

impl InjectedState {
    /// Creates an injection with no slices for `capability`.
    #[must_use]
    pub fn empty(capability: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            ..Self::default()
        }
    }

    /// Copies the slices declared by `definition` out of `state`.
    #[must_use]
    pub fn resolve(definition: &CapabilityDefinition, state: &ConversationState) -> Self {
        let mut injected = Self::empty(definition.name().as_str());
        for slice in definition.injects() {
            match slice {
                StateSlice::ExtractedLocators => {
                    injected.extracted_locators = Some(state.extracted_locators().clone());
                }
                StateSlice::ArtifactReference => {
                    injected.artifact_reference = state.artifact_reference().cloned();
                }
            }
        }
        injected
    }

    /// Sets the locator slice directly.
    #[must_use]
    pub fn with_locators(mut self, locators: LocatorMap) -> Self {
        self.extracted_locators = Some(locators);
        self
    }

    /// Sets the artifact slice directly.
    #[must_use]
    pub fn with_artifact_reference(mut self, reference: ArtifactReference) -> Self {
        self.artifact_reference = Some(reference);
        self
    }

    /// Returns the injected locator map.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityInvocationError::MissingStateSlice`] when the
    /// slice was not injected.
    pub fn locators(&self) -> Result<&LocatorMap, CapabilityInvocationError> {
        self.extracted_locators
            .as_ref()
            .ok_or_else(|| self.missing(StateSlice::ExtractedLocators))
    }

    /// Returns the locator recorded for `label`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityInvocationError::MissingStateSlice`] when the
    /// locator slice was not injected, or
    /// [`CapabilityInvocationError::MissingLocator`] when the label is
    /// unknown.
    pub fn locator(&self, label: &str) -> Result<&str, CapabilityInvocationError> {
        self.locators()?
            .get(label.trim())
            .ok_or_else(|| CapabilityInvocationError::MissingLocator {
                label: label.trim().to_owned(),
            })
    }

    /// Returns the injected artifact reference.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityInvocationError::MissingStateSlice`] when the
    /// slice was not injected or no artifact has been produced yet.
    pub fn artifact_reference(&self) -> Result<&ArtifactReference, CapabilityInvocationError> {
        self.artifact_reference
            .as_ref()
            .ok_or_else(|| self.missing(StateSlice::ArtifactReference))
    }

    fn missing(&self, slice: StateSlice) -> CapabilityInvocationError {
        CapabilityInvocationError::MissingStateSlice {
            capability: self.capability.clone(),
            slice: slice.as_str(),
        }
    }
}
