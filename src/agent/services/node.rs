//! Binds an agent to a graph node and folds its turns into state deltas.

use crate::agent::domain::{
    AgentInvocationError, InstructionContext, InstructionError, InstructionTemplate, TeamMember,
};
use crate::agent::ports::{Agent, AgentReply, AgentRequest};
use crate::capability::domain::{CapabilityDefinition, CapabilityInvocationError};
use crate::conversation::domain::{
    ConversationState, LocatorMap, Message, NextRoleUpdate, StateDelta,
};
use crate::directive::{DirectiveParser, DirectiveScan, LocatorListError};
use crate::graph::domain::NodeName;
use mockable::Clock;
use std::sync::Arc;

/// Label recorded on the error message for a rejected locator list.
const LOCATOR_LIST: &str = "extracted_locators";

/// An agent bound to one graph node.
///
/// Binding happens once: the instruction template is rendered with the
/// node's allow-list and capabilities and the result is reused for every
/// turn.
#[derive(Clone)]
pub struct AgentNode {
    name: NodeName,
    agent: Arc<dyn Agent>,
    parser: DirectiveParser,
    instructions: String,
    allowed_next: Vec<NodeName>,
    team_members: Vec<TeamMember>,
    capabilities: Vec<CapabilityDefinition>,
}

impl AgentNode {
    /// Binds `agent` to the node `name` with no instructions, successors or
    /// capabilities.
    #[must_use]
    pub fn new(name: NodeName, agent: Arc<dyn Agent>, parser: DirectiveParser) -> Self {
        Self {
            name,
            agent,
            parser,
            instructions: String::new(),
            allowed_next: Vec::new(),
            team_members: Vec::new(),
            capabilities: Vec::new(),
        }
    }

    /// Sets the nodes this agent may name in a next-node directive.
    #[must_use]
    pub fn with_allowed_next(mut self, allowed_next: Vec<NodeName>) -> Self {
        self.allowed_next = allowed_next;
        self
    }

    /// Sets the agents this node may delegate to, for its instructions.
    #[must_use]
    pub fn with_team_members(mut self, team_members: Vec<TeamMember>) -> Self {
        self.team_members = team_members;
        self
    }

    /// Sets the capabilities this agent may request.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<CapabilityDefinition>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sets already-rendered instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Renders `template` against this node's allow-list, team members and
    /// capabilities and stores the result as the node's instructions.
    ///
    /// # Errors
    ///
    /// Returns [`InstructionError`] when the template does not render.
    pub fn with_template(
        mut self,
        template: &InstructionTemplate,
    ) -> Result<Self, InstructionError> {
        let team = self.team_members.iter().fold(
            InstructionContext::new(self.name.as_str())
                .with_next_roles(self.allowed_next.iter().map(NodeName::as_str)),
            |context, member| {
                context.with_team_member(member.name.as_str(), member.description.as_str())
            },
        );
        let context = self.capabilities.iter().fold(team, |context, definition| {
            context.with_capability(definition.name().as_str(), definition.description())
        });
        self.instructions = template.render(&context)?;
        Ok(self)
    }

    /// Returns the node name.
    #[must_use]
    pub const fn name(&self) -> &NodeName {
        &self.name
    }

    /// Returns the rendered instructions.
    #[must_use]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Returns the bound capability definitions.
    #[must_use]
    pub fn capabilities(&self) -> &[CapabilityDefinition] {
        &self.capabilities
    }

    /// Runs one agent turn and translates it into a delta.
    ///
    /// The delta appends the agent's message and names this node as sender.
    /// A next-node directive sets `next_role` unless the reply also carries
    /// pending invocations. Extracted locators are merged whenever they
    /// decode. A malformed locator list leaves the locators unchanged and is
    /// reported as a failed capability-result message placed just before the
    /// agent's message, so the turn itself stays last for routing and the
    /// next agent turn sees the error.
    ///
    /// # Errors
    ///
    /// Returns [`AgentInvocationError`] when the agent fails or returns an
    /// empty turn. No retry is attempted here.
    pub async fn execute(
        &self,
        state: &ConversationState,
        clock: &impl Clock,
    ) -> Result<StateDelta, AgentInvocationError> {
        let request = self.request(state);
        let reply = self.agent.invoke(&request).await?;
        if reply.is_empty() {
            return Err(AgentInvocationError::MalformedResponse(format!(
                "node '{}' returned neither content nor capability requests",
                self.name
            )));
        }
        Ok(self.fold(reply, clock))
    }

    fn request(&self, state: &ConversationState) -> AgentRequest {
        AgentRequest {
            node: self.name.to_string(),
            instructions: self.instructions.clone(),
            allowed_next: self.allowed_next.iter().map(ToString::to_string).collect(),
            capabilities: self.capabilities.clone(),
            messages: state.messages().to_vec(),
            extracted_locators: state.extracted_locators().clone(),
            artifact_reference: state.artifact_reference().cloned(),
        }
    }

    fn fold(&self, reply: AgentReply, clock: &impl Clock) -> StateDelta {
        let AgentReply {
            content,
            pending_invocations,
            artifact_reference,
        } = reply;
        let scan = self.parser.scan(&content);
        let requests_capabilities = !pending_invocations.is_empty();

        let mut delta = StateDelta::new();
        match decoded_locators(&scan) {
            Some(Ok(locators)) => delta = delta.with_locators(locators),
            Some(Err(err)) => {
                tracing::warn!(node = %self.name, error = %err, "locator list rejected");
                delta = delta.with_message(Message::capability_error(
                    LOCATOR_LIST,
                    format!("error: {err}"),
                    clock,
                ));
            }
            None => {}
        }
        delta = delta
            .with_message(Message::agent(
                self.name.clone(),
                content,
                pending_invocations,
                clock,
            ))
            .with_sender(self.name.clone());

        match scan.next_node() {
            Some(next) if requests_capabilities => {
                tracing::debug!(
                    node = %self.name,
                    next,
                    "next-node directive ignored while capabilities are pending"
                );
            }
            Some(next) => delta = delta.with_next_role(NextRoleUpdate::Set(next.to_owned())),
            None => {}
        }
        if let Some(reference) = artifact_reference {
            delta = delta.with_artifact_reference(reference);
        }
        delta
    }
}

impl std::fmt::Debug for AgentNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentNode")
            .field("name", &self.name)
            .field("allowed_next", &self.allowed_next)
            .field("capabilities", &self.capabilities.len())
            .finish_non_exhaustive()
    }
}

fn decoded_locators(
    scan: &DirectiveScan,
) -> Option<Result<LocatorMap, CapabilityInvocationError>> {
    scan.locators()
        .map(|decoded| -> Result<LocatorMap, CapabilityInvocationError> {
            let entries = decoded.as_ref().map_err(Clone::clone)?;
            LocatorMap::from_entries(entries).map_err(|err| {
                CapabilityInvocationError::MalformedLocatorList(LocatorListError {
                    reason: err.to_string(),
                })
            })
        })
}
