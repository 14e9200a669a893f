//! Domain types for the shared conversation state.
//!
//! All types are plain values with no infrastructure dependencies and are
//! serialisable via serde.

mod delta;
mod ids;
mod invocation;
mod locator;
mod message;
mod state;

pub use delta::{NextRoleUpdate, StateDelta};
pub use ids::{MessageId, RunId};
pub use invocation::CapabilityInvocation;
pub use locator::{ArtifactReference, LocatorEntryError, LocatorMap};
pub use message::{InvocationStatus, Message, Producer};
pub use state::ConversationState;
