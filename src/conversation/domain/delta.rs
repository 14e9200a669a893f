//! State deltas returned by node execution.

use super::{ArtifactReference, LocatorMap, Message};
use crate::graph::domain::NodeName;

/// How a delta changes `next_role`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NextRoleUpdate {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Replace the value with a freshly parsed directive.
    Set(String),
    /// Drop the current value.
    Clear,
}

/// The change a single node execution makes to the conversation state.
///
/// Deltas are produced by node adapters and merged by the driver; nodes
/// have no other way to affect state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    /// Messages to append, in order.
    pub messages: Vec<Message>,
    /// Change to the routing directive.
    pub next_role: NextRoleUpdate,
    /// New sender, when the producing node takes ownership of the turn.
    pub sender: Option<NodeName>,
    /// Locators to merge into `extracted_locators`.
    pub extracted_locators: Option<LocatorMap>,
    /// Replacement artifact reference.
    pub artifact_reference: Option<ArtifactReference>,
}

impl StateDelta {
    /// Creates an empty delta.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Sets the routing directive update.
    #[must_use]
    pub fn with_next_role(mut self, update: NextRoleUpdate) -> Self {
        self.next_role = update;
        self
    }

    /// Sets the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: NodeName) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets locators to merge.
    #[must_use]
    pub fn with_locators(mut self, locators: LocatorMap) -> Self {
        self.extracted_locators = Some(locators);
        self
    }

    /// Sets the artifact reference.
    #[must_use]
    pub fn with_artifact_reference(mut self, reference: ArtifactReference) -> Self {
        self.artifact_reference = Some(reference);
        self
    }
}
