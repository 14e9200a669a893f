//! Port contracts for capabilities and the collaborator services behind them.

mod capability;
mod collaborator;

pub use capability::{Capability, CapabilityResult};
pub use collaborator::{
    CollaboratorError, CollaboratorResult, DocumentLibrary, DocumentSummary, WebSearch,
};
