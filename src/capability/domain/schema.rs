//! Capability definitions and typed argument schemas.

use super::{CapabilityDomainError, CapabilityInvocationError, CapabilityName, StateSlice};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Type of a capability argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentType {
    /// A JSON string.
    String,
    /// A JSON integer.
    Integer,
    /// A JSON boolean.
    Boolean,
    /// A JSON array of strings.
    StringList,
    /// Any JSON object.
    Object,
}

impl ArgumentType {
    /// Returns a human-readable description used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::StringList => "a list of strings",
            Self::Object => "an object",
        }
    }

    /// Returns `true` when `value` conforms to this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Object => value.is_object(),
        }
    }
}

/// Declaration of one named argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument name.
    pub name: String,
    /// Expected type.
    pub argument_type: ArgumentType,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Description offered to agents.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ArgumentSpec {
    /// Declares a required argument.
    #[must_use]
    pub fn required(name: impl Into<String>, argument_type: ArgumentType) -> Self {
        Self {
            name: name.into(),
            argument_type,
            required: true,
            description: String::new(),
        }
    }

    /// Declares an optional argument.
    #[must_use]
    pub fn optional(name: impl Into<String>, argument_type: ArgumentType) -> Self {
        Self {
            required: false,
            ..Self::required(name, argument_type)
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Everything the orchestration core knows about a capability.
///
/// # Examples
///
/// ```
/// use conductor::capability::domain::{
///     ArgumentSpec, ArgumentType, CapabilityDefinition, CapabilityName, StateSlice,
/// };
///
/// let definition = CapabilityDefinition::new(
///     CapabilityName::new("lookup-section").expect("valid name"),
///     "Returns the text around a section",
/// )
/// .with_argument(ArgumentSpec::required("section", ArgumentType::String))
/// .with_injected(StateSlice::ExtractedLocators);
///
/// assert!(definition.validate_schema().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDefinition {
    name: CapabilityName,
    description: String,
    #[serde(default)]
    arguments: Vec<ArgumentSpec>,
    #[serde(default)]
    injects: Vec<StateSlice>,
}

impl CapabilityDefinition {
    /// Creates a definition with no arguments and no injected state.
    #[must_use]
    pub fn new(name: CapabilityName, description: impl Into<String>) -> Self {
        Self {
            name,
            description: description.into().trim().to_owned(),
            arguments: Vec::new(),
            injects: Vec::new(),
        }
    }

    /// Adds an argument declaration.
    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Declares a state slice to inject at dispatch time.
    #[must_use]
    pub fn with_injected(mut self, slice: StateSlice) -> Self {
        self.injects.push(slice);
        self
    }

    /// Returns the capability name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the argument declarations.
    #[must_use]
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Returns the state slices injected at dispatch time.
    #[must_use]
    pub fn injects(&self) -> &[StateSlice] {
        &self.injects
    }

    /// Checks the definition itself; called once at registration.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] for an empty description, blank or
    /// duplicate argument names, or duplicate state slices.
    pub fn validate_schema(&self) -> Result<(), CapabilityDomainError> {
        if self.description.is_empty() {
            return Err(CapabilityDomainError::EmptyDescription(
                self.name.to_string(),
            ));
        }

        let mut names = HashSet::new();
        for argument in &self.arguments {
            if argument.name.trim().is_empty() {
                return Err(CapabilityDomainError::EmptyArgumentName(
                    self.name.to_string(),
                ));
            }
            if !names.insert(argument.name.as_str()) {
                return Err(CapabilityDomainError::DuplicateArgument {
                    capability: self.name.to_string(),
                    argument: argument.name.clone(),
                });
            }
        }

        let mut slices = HashSet::new();
        for slice in &self.injects {
            if !slices.insert(*slice) {
                return Err(CapabilityDomainError::DuplicateStateSlice {
                    capability: self.name.to_string(),
                    slice: slice.as_str().to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Checks supplied arguments against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityInvocationError`] for undeclared, missing or
    /// mistyped arguments. A `null` value counts as absent.
    pub fn validate_arguments(
        &self,
        supplied: &Map<String, Value>,
    ) -> Result<(), CapabilityInvocationError> {
        if let Some(unknown) = supplied
            .keys()
            .find(|key| !self.arguments.iter().any(|spec| spec.name == **key))
        {
            return Err(CapabilityInvocationError::UnknownArgument {
                capability: self.name.to_string(),
                argument: unknown.clone(),
            });
        }

        for spec in &self.arguments {
            match supplied.get(&spec.name).filter(|value| !value.is_null()) {
                Some(value) if !spec.argument_type.accepts(value) => {
                    return Err(CapabilityInvocationError::InvalidArgument {
                        capability: self.name.to_string(),
                        argument: spec.name.clone(),
                        expected: spec.argument_type.describe(),
                    });
                }
                None if spec.required => {
                    return Err(CapabilityInvocationError::MissingArgument {
                        capability: self.name.to_string(),
                        argument: spec.name.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
