//! Node identity and classification.

use super::{NodeNameError, ParseNodeKindError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a node name.
const MAX_NODE_NAME_LENGTH: usize = 64;

/// Validated, lowercase alphanumeric-plus-underscores node identifier.
///
/// Node names double as routing targets in agent directives, so they are
/// normalised before comparison (e.g. `Paper_Team_Leader` becomes
/// `paper_team_leader`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName(String);

impl NodeName {
    /// Creates a validated node name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`NodeNameError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, NodeNameError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(NodeNameError::Empty);
        }

        if normalized.len() > MAX_NODE_NAME_LENGTH {
            return Err(NodeNameError::TooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !is_valid {
            return Err(NodeNameError::InvalidCharacters(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the node name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeName {
    type Error = NodeNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeName> for String {
    fn from(value: NodeName) -> Self {
        value.0
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role a node plays in the orchestration graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single entry agent that talks to the user and delegates.
    Supervisor,
    /// An agent that coordinates workers for one area.
    TeamLeader,
    /// An agent that performs focused work.
    Worker,
    /// The node that executes pending capability invocations.
    Dispatch,
}

impl NodeKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::TeamLeader => "team_leader",
            Self::Worker => "worker",
            Self::Dispatch => "dispatch",
        }
    }

    /// Returns `true` for agent-backed kinds.
    #[must_use]
    pub const fn is_agent(self) -> bool {
        !matches!(self, Self::Dispatch)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NodeKind {
    type Error = ParseNodeKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "supervisor" => Ok(Self::Supervisor),
            "team_leader" => Ok(Self::TeamLeader),
            "worker" => Ok(Self::Worker),
            "dispatch" => Ok(Self::Dispatch),
            _ => Err(ParseNodeKindError(value.to_owned())),
        }
    }
}
