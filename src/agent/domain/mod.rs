//! Agent domain types: invocation errors and instruction templates.

mod error;
mod instructions;

pub use error::{AgentInvocationError, InstructionError};
pub use instructions::{CapabilitySummary, InstructionContext, InstructionTemplate, TeamMember};
