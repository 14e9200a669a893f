//! Validated capability name type.

use super::CapabilityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a capability name.
const MAX_NAME_LENGTH: usize = 100;

/// Validated capability identifier, e.g. `locate-document`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a validated capability name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_-]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(CapabilityDomainError::EmptyName);
        }

        if normalized.len() > MAX_NAME_LENGTH {
            return Err(CapabilityDomainError::NameTooLong(raw));
        }

        let is_valid = normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_'));
        if !is_valid {
            return Err(CapabilityDomainError::InvalidName(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CapabilityName {
    type Error = CapabilityDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CapabilityName> for String {
    fn from(value: CapabilityName) -> Self {
        value.0
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
