//! The message entry recorded in the conversation log.
//!
//! Messages are immutable once created. Only agent turns may carry pending
//! capability invocations; the constructors enforce this by accepting
//! invocations solely in [`Message::agent`].

use super::{CapabilityInvocation, MessageId};
use crate::graph::domain::NodeName;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome recorded on a capability-result message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    /// The capability returned a result.
    Succeeded,
    /// The invocation failed; the content describes the error.
    Failed,
}

impl InvocationStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Who produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Producer {
    /// The user that opened the run.
    User,
    /// An agent node turn.
    Agent {
        /// Node that produced the turn.
        node: NodeName,
    },
    /// The result of one capability invocation.
    CapabilityResult {
        /// Capability name as requested.
        capability: String,
        /// Call identifier of the originating invocation.
        call_id: String,
        /// Whether the invocation succeeded.
        status: InvocationStatus,
    },
}

/// An entry in the conversation log.
///
/// # Invariants
///
/// - `pending_invocations` is non-empty only for [`Producer::Agent`]
/// - messages are never modified after creation
///
/// # Examples
///
/// ```
/// use conductor::conversation::domain::{Message, Producer};
/// use mockable::DefaultClock;
///
/// let message = Message::user("fetch document 2410.02703", &DefaultClock);
/// assert_eq!(message.producer(), &Producer::User);
/// assert!(!message.has_pending_invocations());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    producer: Producer,
    content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pending_invocations: Vec<CapabilityInvocation>,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a user-authored message.
    #[must_use]
    pub fn user(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::build(Producer::User, content.into(), Vec::new(), clock)
    }

    /// Creates an agent turn, optionally requesting capability invocations.
    #[must_use]
    pub fn agent(
        node: NodeName,
        content: impl Into<String>,
        pending_invocations: Vec<CapabilityInvocation>,
        clock: &impl Clock,
    ) -> Self {
        Self::build(
            Producer::Agent { node },
            content.into(),
            pending_invocations,
            clock,
        )
    }

    /// Creates the result message for one capability invocation.
    #[must_use]
    pub fn capability_result(
        invocation: &CapabilityInvocation,
        status: InvocationStatus,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::build(
            Producer::CapabilityResult {
                capability: invocation.capability().to_owned(),
                call_id: invocation.call_id().to_owned(),
                status,
            },
            content.into(),
            Vec::new(),
            clock,
        )
    }

    /// Creates a failed capability-result message that no invocation
    /// produced, such as a rejected payload in an agent turn.
    ///
    /// The message gets a fresh call identifier so it never matches a
    /// pending invocation.
    #[must_use]
    pub fn capability_error(
        capability: impl Into<String>,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::build(
            Producer::CapabilityResult {
                capability: capability.into(),
                call_id: format!("call-{}", Uuid::new_v4().simple()),
                status: InvocationStatus::Failed,
            },
            content.into(),
            Vec::new(),
            clock,
        )
    }

    fn build(
        producer: Producer,
        content: String,
        pending_invocations: Vec<CapabilityInvocation>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            producer,
            content,
            pending_invocations,
            created_at: clock.utc(),
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the producer of the message.
    #[must_use]
    pub const fn producer(&self) -> &Producer {
        &self.producer
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the capability invocations requested by this turn.
    #[must_use]
    pub fn pending_invocations(&self) -> &[CapabilityInvocation] {
        &self.pending_invocations
    }

    /// Returns `true` when this turn requests at least one invocation.
    #[must_use]
    pub const fn has_pending_invocations(&self) -> bool {
        !self.pending_invocations.is_empty()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` for user-authored messages.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.producer, Producer::User)
    }

    /// Returns `true` for agent turns.
    #[must_use]
    pub const fn is_agent(&self) -> bool {
        matches!(self.producer, Producer::Agent { .. })
    }

    /// Returns `true` for capability results.
    #[must_use]
    pub const fn is_capability_result(&self) -> bool {
        matches!(self.producer, Producer::CapabilityResult { .. })
    }

    /// Returns the invocation status for capability results.
    #[must_use]
    pub const fn invocation_status(&self) -> Option<InvocationStatus> {
        match self.producer {
            Producer::CapabilityResult { status, .. } => Some(status),
            Producer::User | Producer::Agent { .. } => None,
        }
    }
}
