//! Agent adapters: a scripted in-memory agent and a retry decorator.

mod retrying;
mod scripted;

pub use retrying::{RetryPolicy, RetryingAgent};
pub use scripted::ScriptedAgent;
