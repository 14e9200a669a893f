//! The orchestration graph: topology, routing and the driver loop.
//!
//! A graph is a static set of named nodes (one supervisor entry node, team
//! leaders, workers and exactly one Capability Dispatch Node) with an
//! explicit allow-list of legal transitions. The driver alternates node
//! execution and [`services::Router`] decisions until the router
//! terminates the run or a fatal error occurs. `max_steps` bounds the
//! number of node executions so that cyclic directives cannot run forever.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
