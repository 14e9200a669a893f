//! Structured capability requests carried by agent messages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A pending request, made by an agent turn, to run one named capability.
///
/// Invocations are distinct from the free-text directive protocol: they
/// arrive as structured data on the agent reply and are executed by the
/// capability dispatch node in the order they were listed.
///
/// # Examples
///
/// ```
/// use conductor::conversation::domain::CapabilityInvocation;
/// use serde_json::json;
///
/// let invocation = CapabilityInvocation::new("locate-document", json!({"id": "2410.02703"}))
///     .with_call_id("call-1");
/// assert_eq!(invocation.capability(), "locate-document");
/// assert_eq!(invocation.argument("id").and_then(|v| v.as_str()), Some("2410.02703"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityInvocation {
    call_id: String,
    capability: String,
    arguments: Map<String, Value>,
}

impl CapabilityInvocation {
    /// Creates an invocation with a generated call identifier.
    ///
    /// Non-object argument payloads are kept under a single `input` key so
    /// that the named-argument shape is preserved; schema validation at
    /// dispatch time reports the mismatch.
    #[must_use]
    pub fn new(capability: impl Into<String>, arguments: Value) -> Self {
        let named = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("input".to_owned(), other);
                map
            }
        };
        Self {
            call_id: format!("call-{}", Uuid::new_v4().simple()),
            capability: capability.into(),
            arguments: named,
        }
    }

    /// Replaces the generated call identifier.
    #[must_use]
    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        self.call_id = call_id.into();
        self
    }

    /// Returns the call identifier used to match the result message.
    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Returns the requested capability name as supplied by the agent.
    #[must_use]
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Returns the named arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// Returns a single named argument.
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}
