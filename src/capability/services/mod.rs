//! Capability registry and the Capability Dispatch Node.

mod dispatch;
mod registry;

pub use dispatch::CapabilityDispatchNode;
pub use registry::{CapabilityRegistry, CapabilityRegistryError};
