//! Routing and the graph driver.

mod builder;
mod driver;
mod router;

pub use builder::{AgentBinding, GraphBuildError, GraphBuilder};
pub use driver::{OrchestrationError, OrchestrationGraph, RunError, RunReport};
pub use router::{Route, Router, RoutingError};
