//! Domain model for capabilities.
//!
//! A capability declares its name, a typed argument schema and the state
//! slices it needs injected. Invocation failures are values of
//! [`CapabilityInvocationError`]; the dispatch node turns them into
//! error-flavoured result messages instead of aborting the run.

mod error;
mod injection;
mod name;
mod schema;

pub use error::{CapabilityDomainError, CapabilityInvocationError};
pub use injection::{InjectedState, StateSlice};
pub use name::CapabilityName;
pub use schema::{ArgumentSpec, ArgumentType, CapabilityDefinition};
