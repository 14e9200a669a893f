//! Agent nodes: LLM-backed turns folded into conversation deltas.
//!
//! An [`ports::Agent`] is an opaque text-in, message-out operation. The
//! [`services::AgentNode`] binds one agent to a graph node with a rendered
//! instruction template and a fixed set of callable capabilities, invokes
//! it, runs the reply through the directive parser and returns a
//! [`crate::conversation::domain::StateDelta`].
//!
//! The node adapter never retries. Retry lives outside it, in
//! [`adapters::RetryingAgent`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
