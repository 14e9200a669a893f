//! Instruction templates bound once per agent node.

use super::InstructionError;
use minijinja::Environment;
use serde::Serialize;

/// Values available to an instruction template.
///
/// Templates see `node`, `next_roles` (the node's allow-list),
/// `team_members` (agent successors, each with `name` and `description`)
/// and `capabilities` (each with `name` and `description`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstructionContext {
    /// Name of the node being bound.
    pub node: String,
    /// Nodes this node may hand control to.
    pub next_roles: Vec<String>,
    /// Agents this node may delegate to.
    pub team_members: Vec<TeamMember>,
    /// Capabilities bound to this node.
    pub capabilities: Vec<CapabilitySummary>,
}

/// Name and description of an agent a node may delegate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    /// Node name.
    pub name: String,
    /// What the member is for.
    pub description: String,
}

/// Name and description of a bound capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySummary {
    /// Capability name.
    pub name: String,
    /// Capability description.
    pub description: String,
}

impl InstructionContext {
    /// Creates a context for `node`.
    #[must_use]
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            ..Self::default()
        }
    }

    /// Sets the allow-list exposed as `next_roles`.
    #[must_use]
    pub fn with_next_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a delegate exposed in `team_members`.
    #[must_use]
    pub fn with_team_member(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.team_members.push(TeamMember {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    /// Adds a capability exposed in `capabilities`.
    #[must_use]
    pub fn with_capability(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.capabilities.push(CapabilitySummary {
            name: name.into(),
            description: description.into(),
        });
        self
    }
}

/// A `minijinja` instruction template.
///
/// # Examples
///
/// ```
/// use conductor::agent::domain::{InstructionContext, InstructionTemplate};
///
/// let template = InstructionTemplate::new("You are {{ node }}. Next: {{ next_roles | join(', ') }}.");
/// let context = InstructionContext::new("supervisor").with_next_roles(["paper_team_leader"]);
/// let rendered = template.render(&context).expect("template renders");
/// assert_eq!(rendered, "You are supervisor. Next: paper_team_leader.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionTemplate {
    source: String,
}

impl InstructionTemplate {
    /// Wraps template source text.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Returns the template source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Renders the template.
    ///
    /// # Errors
    ///
    /// Returns [`InstructionError`] for syntax errors or failing filters.
    pub fn render(&self, context: &InstructionContext) -> Result<String, InstructionError> {
        let environment = Environment::new();
        environment
            .render_str(&self.source, context)
            .map_err(|error| InstructionError {
                node: context.node.clone(),
                reason: error.to_string(),
            })
    }
}
