//! The shared conversation state container.

use super::{ArtifactReference, LocatorMap, Message, NextRoleUpdate, RunId, StateDelta};
use crate::graph::domain::NodeName;
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Mutable record threaded through every orchestration step.
///
/// The state is created once per run with a single user message and is
/// changed only by merging node deltas through [`ConversationState::apply`].
///
/// # Invariants
///
/// - `messages` only grows; entries are never removed or reordered
/// - `sender` names a node of the graph that owns the run
///
/// # Examples
///
/// ```
/// use conductor::conversation::domain::ConversationState;
/// use conductor::graph::domain::NodeName;
/// use mockable::DefaultClock;
///
/// let entry = NodeName::new("supervisor").expect("valid node name");
/// let state = ConversationState::start(entry.clone(), "hello", &DefaultClock);
/// assert_eq!(state.messages().len(), 1);
/// assert_eq!(state.sender(), &entry);
/// assert!(state.next_role().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    run_id: RunId,
    messages: Vec<Message>,
    next_role: Option<String>,
    sender: NodeName,
    extracted_locators: LocatorMap,
    artifact_reference: Option<ArtifactReference>,
}

impl ConversationState {
    /// Creates the initial state for a run: one user message, no routing
    /// directive, and `sender` set to the entry node.
    #[must_use]
    pub fn start(entry: NodeName, request: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            run_id: RunId::new(),
            messages: vec![Message::user(request, clock)],
            next_role: None,
            sender: entry,
            extracted_locators: LocatorMap::new(),
            artifact_reference: None,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Returns the full message log in append order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the most recently parsed routing directive, if any.
    #[must_use]
    pub fn next_role(&self) -> Option<&str> {
        self.next_role.as_deref()
    }

    /// Returns the node that produced the latest agent delta.
    #[must_use]
    pub const fn sender(&self) -> &NodeName {
        &self.sender
    }

    /// Returns the locators discovered so far.
    #[must_use]
    pub const fn extracted_locators(&self) -> &LocatorMap {
        &self.extracted_locators
    }

    /// Returns the artifact reference produced by an earlier turn.
    #[must_use]
    pub const fn artifact_reference(&self) -> Option<&ArtifactReference> {
        self.artifact_reference.as_ref()
    }

    /// Counts messages matching `predicate`.
    #[must_use]
    pub fn count_messages(&self, predicate: impl Fn(&Message) -> bool) -> usize {
        self.messages.iter().filter(|&message| predicate(message)).count()
    }

    /// Merges a node delta into the state.
    ///
    /// Messages are appended in delta order, locators are merged with new
    /// keys winning, and `sender` / `artifact_reference` are replaced only
    /// when the delta carries a value.
    pub fn apply(&mut self, delta: StateDelta) {
        let StateDelta {
            messages,
            next_role,
            sender,
            extracted_locators,
            artifact_reference,
        } = delta;

        self.messages.extend(messages);
        match next_role {
            NextRoleUpdate::Keep => {}
            NextRoleUpdate::Set(role) => self.next_role = Some(role),
            NextRoleUpdate::Clear => self.next_role = None,
        }
        if let Some(node) = sender {
            self.sender = node;
        }
        if let Some(locators) = extracted_locators {
            self.extracted_locators.merge(locators);
        }
        if let Some(reference) = artifact_reference {
            self.artifact_reference = Some(reference);
        }
    }
}
