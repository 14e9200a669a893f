//! Shared conversation state threaded through every orchestration step.
//!
//! The conversation module owns the append-only message log, the routing
//! bookkeeping (`next_role`, `sender`) and the state-scoped context that
//! capabilities may have injected (`extracted_locators`,
//! `artifact_reference`). Nodes never mutate state directly: they return a
//! [`domain::StateDelta`] which the driver merges with
//! [`domain::ConversationState::apply`].

pub mod domain;

#[cfg(test)]
mod tests;
