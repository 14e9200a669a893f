//! The Agent Node Adapter.

mod node;

pub use node::AgentNode;
