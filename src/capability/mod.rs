//! Capability registry and the capability dispatch node.
//!
//! Capabilities are named external operations with typed arguments. They
//! are registered once in a [`services::CapabilityRegistry`], which
//! validates every definition at registration time, and executed by the
//! [`services::CapabilityDispatchNode`] when an agent turn requests them.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Dispatch and registry services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
