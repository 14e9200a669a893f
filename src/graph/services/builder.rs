//! Assembles an [`OrchestrationGraph`] from a topology, agents and a
//! capability registry.

use super::{OrchestrationGraph, Router};
use crate::agent::domain::{InstructionError, InstructionTemplate, TeamMember};
use crate::agent::ports::Agent;
use crate::agent::services::AgentNode;
use crate::capability::services::{CapabilityDispatchNode, CapabilityRegistry};
use crate::directive::{DirectiveMarkersError, DirectiveParser};
use crate::graph::domain::{
    DEFAULT_MAX_STEPS, GraphConfig, NodeKind, NodeName, Topology, TopologyError,
};
use mockable::{Clock, DefaultClock};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while assembling a graph.
#[derive(Debug, Clone, Error)]
pub enum GraphBuildError {
    /// The topology is invalid.
    #[error(transparent)]
    Topology(#[from] TopologyError),

    /// The directive markers are unusable.
    #[error(transparent)]
    Markers(#[from] DirectiveMarkersError),

    /// An instruction template failed to render.
    #[error(transparent)]
    Instruction(#[from] InstructionError),

    /// The step ceiling is zero.
    #[error("max_steps must be at least 1")]
    ZeroMaxSteps,

    /// An agent is bound to a node the topology does not declare.
    #[error("agent bound to undeclared node '{0}'")]
    UnknownAgentNode(String),

    /// An agent is bound to the dispatch node.
    #[error("node '{0}' is the dispatch node and cannot host an agent")]
    NotAnAgentNode(NodeName),

    /// Two agents are bound to the same node.
    #[error("node '{0}' has more than one agent bound")]
    DuplicateAgent(NodeName),

    /// An agent node has no agent bound.
    #[error("node '{0}' has no agent bound")]
    MissingAgent(NodeName),

    /// A node is bound to a capability the registry does not hold.
    #[error("node '{node}' is bound to unknown capability '{capability}'")]
    UnknownCapability {
        /// Node declaring the binding.
        node: NodeName,
        /// Capability name as declared.
        capability: String,
    },
}

/// One agent, its instructions and the capabilities it may request.
#[derive(Clone)]
pub struct AgentBinding {
    node: String,
    agent: Arc<dyn Agent>,
    description: String,
    template: InstructionTemplate,
    capabilities: Vec<String>,
}

impl AgentBinding {
    /// Binds `agent` to the node named `node`.
    #[must_use]
    pub fn new(node: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            node: node.into(),
            agent,
            description: String::new(),
            template: InstructionTemplate::default(),
            capabilities: Vec::new(),
        }
    }

    /// Sets the description shown to the nodes that may delegate to this
    /// one.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the instruction template.
    #[must_use]
    pub fn with_instructions(mut self, template: InstructionTemplate) -> Self {
        self.template = template;
        self
    }

    /// Sets the capabilities the agent may request.
    #[must_use]
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }
}

impl std::fmt::Debug for AgentBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentBinding")
            .field("node", &self.node)
            .field("description", &self.description)
            .field("template", &self.template)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// Builder for [`OrchestrationGraph`].
///
/// There is no global state: the topology, registry, agents and clock are
/// all supplied here and shared by `Arc`.
#[derive(Debug, Clone)]
pub struct GraphBuilder<C: Clock + Send + Sync = DefaultClock> {
    topology: Topology,
    registry: Arc<CapabilityRegistry>,
    parser: DirectiveParser,
    bindings: Vec<AgentBinding>,
    max_steps: usize,
    clock: Arc<C>,
}

impl GraphBuilder<DefaultClock> {
    /// Starts a builder over `topology` and `registry` with default markers,
    /// the default step ceiling and the system clock.
    #[must_use]
    pub fn new(topology: Topology, registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            topology,
            registry,
            parser: DirectiveParser::default(),
            bindings: Vec::new(),
            max_steps: DEFAULT_MAX_STEPS,
            clock: Arc::new(DefaultClock),
        }
    }

    /// Starts a builder from a TOML configuration.
    ///
    /// Every entry of `agents` is bound to the node of the same name, with
    /// the instructions and capabilities the configuration declares for it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphBuildError`] when the topology or markers are invalid.
    pub fn from_config(
        config: &GraphConfig,
        agents: &BTreeMap<String, Arc<dyn Agent>>,
        registry: Arc<CapabilityRegistry>,
    ) -> Result<Self, GraphBuildError> {
        let mut builder = Self::new(config.topology()?, registry)
            .with_parser(config.parser()?)
            .with_max_steps(config.max_steps);
        for (name, agent) in agents {
            let mut binding = AgentBinding::new(name.as_str(), Arc::clone(agent));
            if let Some(node) = config.node(name) {
                binding = binding
                    .with_description(node.description.as_str())
                    .with_instructions(InstructionTemplate::new(node.instructions.as_str()))
                    .with_capabilities(node.capabilities.iter().map(String::as_str));
            }
            builder = builder.bind(binding);
        }
        Ok(builder)
    }
}

impl<C: Clock + Send + Sync> GraphBuilder<C> {
    /// Replaces the clock used to timestamp messages.
    #[must_use]
    pub fn with_clock<D: Clock + Send + Sync>(self, clock: Arc<D>) -> GraphBuilder<D> {
        GraphBuilder {
            topology: self.topology,
            registry: self.registry,
            parser: self.parser,
            bindings: self.bindings,
            max_steps: self.max_steps,
            clock,
        }
    }

    /// Replaces the directive parser.
    #[must_use]
    pub fn with_parser(mut self, parser: DirectiveParser) -> Self {
        self.parser = parser;
        self
    }

    /// Sets the step ceiling.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Adds an agent binding.
    #[must_use]
    pub fn bind(mut self, binding: AgentBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Binds `agent` to `node` with no instructions or capabilities.
    #[must_use]
    pub fn agent(self, node: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        self.bind(AgentBinding::new(node, agent))
    }

    /// Validates the bindings and builds the graph.
    ///
    /// Each agent node receives its allow-list from the topology, the
    /// descriptions of the agents it may delegate to and the definitions of
    /// its bound capabilities. Its instruction template is rendered once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphBuildError`] when the step ceiling is zero, a binding
    /// targets an undeclared, duplicate or dispatch node, an agent node is
    /// left unbound, a capability is unknown, or a template fails.
    pub fn build(mut self) -> Result<OrchestrationGraph<C>, GraphBuildError> {
        if self.max_steps == 0 {
            return Err(GraphBuildError::ZeroMaxSteps);
        }

        let descriptions: BTreeMap<NodeName, String> = self
            .bindings
            .iter()
            .filter_map(|binding| {
                self.topology
                    .resolve(&binding.node)
                    .map(|name| (name.clone(), binding.description.clone()))
            })
            .collect();
        let mut agents = BTreeMap::new();
        for binding in std::mem::take(&mut self.bindings) {
            let node = self.bind_node(binding, &descriptions)?;
            let name = node.name().clone();
            if agents.insert(name.clone(), node).is_some() {
                return Err(GraphBuildError::DuplicateAgent(name));
            }
        }
        if let Some((unbound, _)) = self
            .topology
            .nodes()
            .find(|(name, kind)| kind.is_agent() && !agents.contains_key(*name))
        {
            return Err(GraphBuildError::MissingAgent(unbound.clone()));
        }

        let bindings = agents
            .iter()
            .map(|(name, node)| {
                let bound = node
                    .capabilities()
                    .iter()
                    .map(|definition| definition.name().clone())
                    .collect();
                (name.clone(), bound)
            })
            .collect();
        let topology = Arc::new(self.topology);
        let dispatch =
            CapabilityDispatchNode::new(topology.dispatch().clone(), Arc::clone(&self.registry))
                .with_bindings(bindings);
        let router = Router::new(Arc::clone(&topology), self.parser);
        Ok(OrchestrationGraph::new(
            router,
            topology,
            agents,
            dispatch,
            self.max_steps,
            self.clock,
        ))
    }

    fn bind_node(
        &self,
        binding: AgentBinding,
        descriptions: &BTreeMap<NodeName, String>,
    ) -> Result<AgentNode, GraphBuildError> {
        let AgentBinding {
            node,
            agent,
            template,
            capabilities,
            ..
        } = binding;
        let name = self
            .topology
            .resolve(&node)
            .cloned()
            .ok_or_else(|| GraphBuildError::UnknownAgentNode(node))?;
        if self.topology.kind(&name) == Some(NodeKind::Dispatch) {
            return Err(GraphBuildError::NotAnAgentNode(name));
        }

        let definitions = capabilities
            .into_iter()
            .map(|capability| {
                self.registry
                    .definition(&capability)
                    .cloned()
                    .ok_or_else(|| GraphBuildError::UnknownCapability {
                        node: name.clone(),
                        capability,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let successors = self.topology.successors(&name);
        let team_members = successors
            .iter()
            .filter(|successor| self.topology.kind(successor).is_some_and(NodeKind::is_agent))
            .map(|successor| TeamMember {
                name: successor.as_str().to_owned(),
                description: descriptions.get(*successor).cloned().unwrap_or_default(),
            })
            .collect();
        let allowed_next = successors.into_iter().cloned().collect();

        Ok(AgentNode::new(name, agent, self.parser.clone())
            .with_allowed_next(allowed_next)
            .with_team_members(team_members)
            .with_capabilities(definitions)
            .with_template(&template)?)
    }
}
