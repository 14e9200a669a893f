//! Literal markers recognised in agent output.

use super::DirectiveMarkersError;
use serde::{Deserialize, Serialize};

/// The literal markers of the directive protocol.
///
/// Defaults follow the protocol agents are instructed with:
/// `<next_agent>name</next_agent>`, `<FINISHED>` and
/// `<extracted_locators>[...]</extracted_locators>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectiveMarkers {
    /// Opening tag of a next-node directive.
    pub next_node_open: String,
    /// Closing tag of a next-node directive.
    pub next_node_close: String,
    /// Termination marker.
    pub termination: String,
    /// Opening tag of a locator list.
    pub locators_open: String,
    /// Closing tag of a locator list.
    pub locators_close: String,
}

impl Default for DirectiveMarkers {
    fn default() -> Self {
        Self {
            next_node_open: "<next_agent>".to_owned(),
            next_node_close: "</next_agent>".to_owned(),
            termination: "<FINISHED>".to_owned(),
            locators_open: "<extracted_locators>".to_owned(),
            locators_close: "</extracted_locators>".to_owned(),
        }
    }
}

impl DirectiveMarkers {
    /// Checks that every marker is usable for scanning.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveMarkersError`] when a marker is blank or a tag
    /// pair uses the same literal for opening and closing.
    pub fn validate(&self) -> Result<(), DirectiveMarkersError> {
        let markers = [
            ("next_node_open", &self.next_node_open),
            ("next_node_close", &self.next_node_close),
            ("termination", &self.termination),
            ("locators_open", &self.locators_open),
            ("locators_close", &self.locators_close),
        ];
        if let Some((name, _)) = markers
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(DirectiveMarkersError::EmptyMarker(name));
        }
        if self.next_node_open == self.next_node_close {
            return Err(DirectiveMarkersError::AmbiguousPair("next_node"));
        }
        if self.locators_open == self.locators_close {
            return Err(DirectiveMarkersError::AmbiguousPair("locators"));
        }
        Ok(())
    }
}
