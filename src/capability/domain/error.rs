//! Error types for capability definitions and invocations.

use crate::directive::LocatorListError;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while constructing capability definitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityDomainError {
    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyName,

    /// The capability name contains characters outside `[a-z0-9_-]`.
    #[error(
        "capability name '{0}' contains invalid characters (only lowercase alphanumeric, hyphens and underscores allowed)"
    )]
    InvalidName(String),

    /// The capability name exceeds the 100-character limit.
    #[error("capability name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// The description is empty after trimming.
    #[error("capability '{0}' must have a description")]
    EmptyDescription(String),

    /// An argument name is empty.
    #[error("capability '{0}' declares an argument with an empty name")]
    EmptyArgumentName(String),

    /// Two arguments share a name.
    #[error("capability '{capability}' declares argument '{argument}' more than once")]
    DuplicateArgument {
        /// Capability name.
        capability: String,
        /// Repeated argument name.
        argument: String,
    },

    /// A state slice is declared twice.
    #[error("capability '{capability}' requests state slice '{slice}' more than once")]
    DuplicateStateSlice {
        /// Capability name.
        capability: String,
        /// Repeated slice name.
        slice: String,
    },
}

/// A recoverable failure of one capability invocation.
///
/// The dispatch node records these as error-content result messages and
/// carries on with the remaining invocations.
#[derive(Debug, Clone, Error)]
pub enum CapabilityInvocationError {
    /// No capability with the requested name is registered.
    #[error("unknown capability '{0}'")]
    UnknownCapability(String),

    /// The capability exists but is not bound to the requesting node.
    #[error("capability '{capability}' is not bound to node '{node}'")]
    NotBound {
        /// Capability name.
        capability: String,
        /// Node that requested it.
        node: String,
    },

    /// An argument was supplied that the schema does not declare.
    #[error("unknown argument '{argument}' for capability '{capability}'")]
    UnknownArgument {
        /// Capability name.
        capability: String,
        /// Undeclared argument name.
        argument: String,
    },

    /// A required argument is missing.
    #[error("missing required argument '{argument}' for capability '{capability}'")]
    MissingArgument {
        /// Capability name.
        capability: String,
        /// Missing argument name.
        argument: String,
    },

    /// An argument value does not match its declared type.
    #[error("argument '{argument}' for capability '{capability}' must be {expected}")]
    InvalidArgument {
        /// Capability name.
        capability: String,
        /// Offending argument name.
        argument: String,
        /// Expected type description.
        expected: &'static str,
    },

    /// A state slice the capability needs is not available.
    #[error("capability '{capability}' requires state slice '{slice}', which is not available")]
    MissingStateSlice {
        /// Capability name.
        capability: String,
        /// Missing slice name.
        slice: &'static str,
    },

    /// The injected locator map has no entry for the requested label.
    #[error("no locator recorded for '{label}'")]
    MissingLocator {
        /// Requested label.
        label: String,
    },

    /// An agent emitted a locator list that could not be decoded.
    #[error(transparent)]
    MalformedLocatorList(#[from] LocatorListError),

    /// The capability ran and failed.
    #[error("capability '{capability}' failed: {source}")]
    Failed {
        /// Capability name.
        capability: String,
        /// Underlying failure.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl CapabilityInvocationError {
    /// Wraps a failure raised while a capability was running.
    pub fn failed(
        capability: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Failed {
            capability: capability.into(),
            source: Arc::new(err),
        }
    }
}
