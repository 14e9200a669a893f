//! Domain model for the orchestration graph.
//!
//! Nodes are identified by validated [`NodeName`]s and classified by
//! [`NodeKind`]. The [`Topology`] holds the explicit allow-list of legal
//! next nodes per node and is validated once when it is built.
//! [`GraphConfig`] describes a graph declaratively in TOML.

mod config;
mod error;
mod node;
mod topology;

pub use config::{ConfigError, DEFAULT_MAX_STEPS, DispatchConfig, GraphConfig, NodeConfig};
pub use error::{NodeNameError, ParseNodeKindError, TopologyError};
pub use node::{NodeKind, NodeName};
pub use topology::{Topology, TopologyBuilder};
