//! Error types for graph domain validation.

use thiserror::Error;

/// Errors returned while validating a node name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeNameError {
    /// The node name is empty after trimming.
    #[error("node name must not be empty")]
    Empty,

    /// The node name contains characters outside `[a-z0-9_]`.
    #[error(
        "node name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidCharacters(String),

    /// The node name exceeds the 64-character limit.
    #[error("node name exceeds 64 character limit: {0}")]
    TooLong(String),
}

/// Error returned while parsing a node kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown node kind: {0}")]
pub struct ParseNodeKindError(pub String);

/// Errors returned while building a topology.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// A node name failed validation.
    #[error(transparent)]
    InvalidNodeName(#[from] NodeNameError),

    /// The same node was declared twice.
    #[error("node '{0}' is declared more than once")]
    DuplicateNode(String),

    /// No entry node was set.
    #[error("topology has no entry node")]
    MissingEntry,

    /// The entry node is not declared.
    #[error("entry node '{0}' is not declared")]
    UnknownEntry(String),

    /// The entry node is not the supervisor.
    #[error("entry node '{name}' must be a supervisor, found {kind}")]
    EntryNotSupervisor {
        /// Entry node name.
        name: String,
        /// Declared kind of the entry node.
        kind: String,
    },

    /// The topology does not have exactly one supervisor.
    #[error("topology must declare exactly one supervisor, found {0}")]
    SupervisorCount(usize),

    /// The topology does not have exactly one capability dispatch node.
    #[error("topology must declare exactly one capability dispatch node, found {0}")]
    DispatchCount(usize),

    /// An edge names a node that is not declared.
    #[error("edge '{from}' -> '{to}' targets an undeclared node")]
    UnknownEdgeTarget {
        /// Edge source.
        from: String,
        /// Undeclared edge target.
        to: String,
    },

    /// An edge starts at a node that is not declared.
    #[error("edge '{from}' -> '{to}' starts at an undeclared node")]
    UnknownEdgeSource {
        /// Undeclared edge source.
        from: String,
        /// Edge target.
        to: String,
    },

    /// Outgoing edges of the dispatch node are derived and cannot be declared.
    #[error("edges out of the capability dispatch node '{0}' are derived from its callers")]
    DispatchEdgeDeclared(String),
}
