//! TOML graph configuration.

use super::{NodeKind, Topology, TopologyError};
use crate::directive::{DirectiveMarkers, DirectiveMarkersError, DirectiveParser};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default ceiling on node executions per run.
pub const DEFAULT_MAX_STEPS: usize = 25;

const fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

/// Errors returned while loading a graph configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read graph configuration '{}': {source}", path.display())]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The TOML is malformed or has unknown fields.
    #[error("invalid graph configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Declarative description of an orchestration graph.
///
/// ```toml
/// entry = "supervisor"
/// max_steps = 25
///
/// [dispatch]
/// name = "call_tool"
///
/// [[nodes]]
/// name = "supervisor"
/// kind = "supervisor"
/// next = ["paper_team_leader"]
/// instructions = "You are {{ node }}."
///
/// [[nodes]]
/// name = "paper_team_leader"
/// kind = "team_leader"
/// next = ["supervisor", "call_tool"]
/// capabilities = ["locate-document", "lookup-section"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    /// Entry node; must be the supervisor.
    pub entry: String,
    /// Maximum node executions per run.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Directive marker overrides.
    #[serde(default)]
    pub markers: DirectiveMarkers,
    /// The Capability Dispatch Node.
    pub dispatch: DispatchConfig,
    /// Agent nodes.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Configuration of the Capability Dispatch Node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Node name.
    pub name: String,
}

/// Configuration of one agent node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// Node name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Legal next nodes.
    #[serde(default)]
    pub next: Vec<String>,
    /// What the node is for, shown to nodes that may delegate to it.
    #[serde(default)]
    pub description: String,
    /// Instruction template source.
    #[serde(default)]
    pub instructions: String,
    /// Capabilities bound to the node.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl GraphConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, or
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = file.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the validated topology described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError`] for invalid names, edges or node counts.
    pub fn topology(&self) -> Result<Topology, TopologyError> {
        let declared = self.nodes.iter().fold(
            Topology::builder().node(self.dispatch.name.as_str(), NodeKind::Dispatch),
            |builder, node| builder.node(node.name.as_str(), node.kind),
        );
        self.nodes
            .iter()
            .flat_map(|node| node.next.iter().map(move |to| (node.name.as_str(), to.as_str())))
            .fold(declared, |builder, (from, to)| builder.edge(from, to))
            .entry(self.entry.as_str())
            .build()
    }

    /// Builds the directive parser for the configured markers.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveMarkersError`] when a marker is unusable.
    pub fn parser(&self) -> Result<DirectiveParser, DirectiveMarkersError> {
        DirectiveParser::new(self.markers.clone())
    }

    /// Returns the configuration of the named agent node.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&NodeConfig> {
        let wanted = name.trim();
        self.nodes
            .iter()
            .find(|node| node.name.trim().eq_ignore_ascii_case(wanted))
    }
}
