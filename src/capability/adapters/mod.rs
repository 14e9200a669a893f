//! Capability implementations and collaborator adapters.
//!
//! The document and web capabilities translate validated arguments and
//! injected state into calls on the collaborator ports. The in-memory
//! collaborators in [`memory`] back tests and deterministic local runs.

pub mod memory;

mod document;
mod function;
mod web;

pub use document::{ExtractLocators, LocateDocument, LookupSection, RecentDocuments};
pub use function::FunctionCapability;
pub use web::WebSearchCapability;

use crate::capability::domain::{CapabilityDefinition, CapabilityInvocationError};
use serde_json::{Map, Value};

/// Reads a string argument that schema validation already declared required.
fn string_argument<'a>(
    definition: &CapabilityDefinition,
    arguments: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a str, CapabilityInvocationError> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or_else(|| CapabilityInvocationError::MissingArgument {
            capability: definition.name().to_string(),
            argument: name.to_owned(),
        })
}
