//! Port contract for agent backends.

mod agent;

pub use agent::{Agent, AgentReply, AgentRequest, AgentResult};
