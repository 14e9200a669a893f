//! Capabilities backed by a [`DocumentLibrary`].

use super::string_argument;
use crate::capability::domain::{
    ArgumentSpec, ArgumentType, CapabilityDefinition, CapabilityDomainError,
    CapabilityInvocationError, CapabilityName, InjectedState, StateSlice,
};
use crate::capability::ports::{Capability, CapabilityResult, DocumentLibrary};
use crate::conversation::domain::LocatorMap;
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::ops::RangeInclusive;
use std::sync::Arc;
use thiserror::Error;

/// A locator that does not name a page number.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("locator '{locator}' for section '{label}' is not a page number")]
pub struct PageLocatorError {
    label: String,
    locator: String,
}

/// Pages read around a section start: the page before, the page itself and
/// the page after. A section on the first page reads pages `0..=1`.
const fn page_window(page: u32) -> RangeInclusive<u32> {
    match page.checked_sub(1) {
        Some(previous) => previous..=page.saturating_add(1),
        None => 0..=1,
    }
}

fn locators_json(locators: &LocatorMap) -> Value {
    Value::Object(
        locators
            .iter()
            .map(|(label, locator)| (label.to_owned(), Value::String(locator.to_owned())))
            .collect(),
    )
}

/// Retrieves a document and reports its artifact and section locators.
///
/// The result object carries `artifact` and `locators`, which the agent
/// that requested the call can echo through directives.
pub struct LocateDocument<L: DocumentLibrary> {
    library: Arc<L>,
    definition: CapabilityDefinition,
}

impl<L: DocumentLibrary> LocateDocument<L> {
    /// Creates the capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] if the built-in name is rejected.
    pub fn new(library: Arc<L>) -> Result<Self, CapabilityDomainError> {
        let definition = CapabilityDefinition::new(
            CapabilityName::new("locate-document")?,
            "Retrieve a document by identifier and list its section locators.",
        )
        .with_argument(
            ArgumentSpec::required("document_id", ArgumentType::String)
                .with_description("Identifier of the document to retrieve."),
        );
        Ok(Self {
            library,
            definition,
        })
    }
}

#[async_trait]
impl<L: DocumentLibrary> Capability for LocateDocument<L> {
    fn definition(&self) -> &CapabilityDefinition {
        &self.definition
    }

    async fn invoke(
        &self,
        arguments: &Map<String, Value>,
        _injected: &InjectedState,
    ) -> CapabilityResult<Value> {
        let name = self.definition.name().as_str();
        let document_id = string_argument(&self.definition, arguments, "document_id")?;
        let artifact = self
            .library
            .retrieve(document_id)
            .await
            .map_err(|err| CapabilityInvocationError::failed(name, err))?;
        let locators = self
            .library
            .extract_locators(&artifact)
            .await
            .map_err(|err| CapabilityInvocationError::failed(name, err))?;
        Ok(json!({
            "artifact": artifact.as_str(),
            "locators": locators_json(&locators),
        }))
    }
}

/// Extracts section locators from the artifact already in the conversation.
pub struct ExtractLocators<L: DocumentLibrary> {
    library: Arc<L>,
    definition: CapabilityDefinition,
}

impl<L: DocumentLibrary> ExtractLocators<L> {
    /// Creates the capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] if the built-in name is rejected.
    pub fn new(library: Arc<L>) -> Result<Self, CapabilityDomainError> {
        let definition = CapabilityDefinition::new(
            CapabilityName::new("extract-locators")?,
            "List the section locators of the current document.",
        )
        .with_injected(StateSlice::ArtifactReference);
        Ok(Self {
            library,
            definition,
        })
    }
}

#[async_trait]
impl<L: DocumentLibrary> Capability for ExtractLocators<L> {
    fn definition(&self) -> &CapabilityDefinition {
        &self.definition
    }

    async fn invoke(
        &self,
        _arguments: &Map<String, Value>,
        injected: &InjectedState,
    ) -> CapabilityResult<Value> {
        let artifact = injected.artifact_reference()?;
        let locators = self
            .library
            .extract_locators(artifact)
            .await
            .map_err(|err| CapabilityInvocationError::failed(self.definition.name().as_str(), err))?;
        Ok(locators_json(&locators))
    }
}

/// Reads the pages around a named section of the current document.
///
/// Needs both the locator map and the artifact reference from state.
pub struct LookupSection<L: DocumentLibrary> {
    library: Arc<L>,
    definition: CapabilityDefinition,
}

impl<L: DocumentLibrary> LookupSection<L> {
    /// Creates the capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] if the built-in name is rejected.
    pub fn new(library: Arc<L>) -> Result<Self, CapabilityDomainError> {
        let definition = CapabilityDefinition::new(
            CapabilityName::new("lookup-section")?,
            "Read the text of a named section of the current document.",
        )
        .with_argument(
            ArgumentSpec::required("section", ArgumentType::String)
                .with_description("Section label as listed in the extracted locators."),
        )
        .with_injected(StateSlice::ExtractedLocators)
        .with_injected(StateSlice::ArtifactReference);
        Ok(Self {
            library,
            definition,
        })
    }
}

#[async_trait]
impl<L: DocumentLibrary> Capability for LookupSection<L> {
    fn definition(&self) -> &CapabilityDefinition {
        &self.definition
    }

    async fn invoke(
        &self,
        arguments: &Map<String, Value>,
        injected: &InjectedState,
    ) -> CapabilityResult<Value> {
        let name = self.definition.name().as_str();
        let label = string_argument(&self.definition, arguments, "section")?;
        let locator = injected.locator(label)?;
        let artifact = injected.artifact_reference()?;
        let page = locator.trim().parse::<u32>().map_err(|_| {
            CapabilityInvocationError::failed(
                name,
                PageLocatorError {
                    label: label.to_owned(),
                    locator: locator.to_owned(),
                },
            )
        })?;

        let pages = self
            .library
            .read_pages(artifact, page_window(page))
            .await
            .map_err(|err| CapabilityInvocationError::failed(name, err))?;
        Ok(Value::String(pages.join("\n")))
    }
}

/// Lists recently published documents in a subject domain as markdown.
pub struct RecentDocuments<L: DocumentLibrary> {
    library: Arc<L>,
    definition: CapabilityDefinition,
}

impl<L: DocumentLibrary> RecentDocuments<L> {
    /// Creates the capability.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] if the built-in name is rejected.
    pub fn new(library: Arc<L>) -> Result<Self, CapabilityDomainError> {
        let definition = CapabilityDefinition::new(
            CapabilityName::new("recent-documents")?,
            "List recently published documents in a subject domain.",
        )
        .with_argument(
            ArgumentSpec::required("domain", ArgumentType::String)
                .with_description("Subject domain, for example 'cs.ai'."),
        );
        Ok(Self {
            library,
            definition,
        })
    }
}

#[async_trait]
impl<L: DocumentLibrary> Capability for RecentDocuments<L> {
    fn definition(&self) -> &CapabilityDefinition {
        &self.definition
    }

    async fn invoke(
        &self,
        arguments: &Map<String, Value>,
        _injected: &InjectedState,
    ) -> CapabilityResult<Value> {
        let domain = string_argument(&self.definition, arguments, "domain")?;
        let listing = self
            .library
            .recent(domain)
            .await
            .map_err(|err| CapabilityInvocationError::failed(self.definition.name().as_str(), err))?;
        if listing.is_empty() {
            return Ok(Value::String(format!("No recent documents in '{domain}'.")));
        }
        let rendered = listing
            .iter()
            .map(|document| {
                format!(
                    "- **{}** ({})\n  {}",
                    document.title, document.id, document.summary
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Value::String(rendered))
    }
}
