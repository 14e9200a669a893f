//! Error types for directive markers and payloads.

use thiserror::Error;

/// The body of a locator-list tag is not a JSON array of
/// `"label: locator"` strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed locator list: {reason}")]
pub struct LocatorListError {
    /// Decoder failure description.
    pub reason: String,
}

/// Errors returned while validating configured markers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectiveMarkersError {
    /// A marker is empty after trimming.
    #[error("directive marker '{0}' must not be empty")]
    EmptyMarker(&'static str),

    /// An opening and closing marker are identical.
    #[error("opening and closing markers for '{0}' must differ")]
    AmbiguousPair(&'static str),
}
