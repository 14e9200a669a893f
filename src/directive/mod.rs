//! Extraction of routing directives from free-form agent output.
//!
//! Agents steer the orchestration with three markers embedded in their text:
//! a next-node tag, a termination marker and a locator-list tag. The
//! [`DirectiveParser`] scans text for each marker independently and returns
//! a [`DirectiveScan`], validated once at this boundary, so that node
//! adapters and the router never re-parse text ad hoc.

mod error;
mod markers;
mod parser;

pub use error::{DirectiveMarkersError, LocatorListError};
pub use markers::DirectiveMarkers;
pub use parser::{Directive, DirectiveParser, DirectiveScan};
