//! Conductor: orchestration core for cooperating agents and capabilities.
//!
//! A run threads one shared conversation state through a static graph of
//! agent nodes and a single capability dispatch node. Agents steer control
//! with directives embedded in their text; the router validates every
//! transition against the graph's allow-list and the driver stops on
//! termination, on a fatal error, or when the step ceiling is reached.
//!
//! # Architecture
//!
//! Conductor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for agents, capabilities and
//!   collaborator services
//! - **Adapters**: Concrete implementations of ports (in-memory, scripted)
//!
//! # Modules
//!
//! - [`conversation`]: Shared conversation state and state deltas
//! - [`directive`]: Directive extraction from agent output
//! - [`capability`]: Capability schemas, registry and the dispatch node
//! - [`agent`]: Agent port and the agent node adapter
//! - [`graph`]: Topology, router and the run driver

pub mod agent;
pub mod capability;
pub mod conversation;
pub mod directive;
pub mod graph;
