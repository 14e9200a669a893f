//! Directive scanner.

use super::{DirectiveMarkers, DirectiveMarkersError, LocatorListError};

/// A structured routing instruction recovered from agent output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Hand control to the named node.
    NextNode(String),
    /// The run is complete.
    Terminate,
    /// Locator entries discovered by the agent, as `label: locator` strings.
    ExtractedLocators(Vec<String>),
}

/// Result of scanning one text for all directive markers.
///
/// Each marker type is resolved independently. When a tag appears more than
/// once, the last non-empty occurrence wins. Absent markers are simply
/// `None`/`false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveScan {
    next_node: Option<String>,
    terminate: bool,
    locators: Option<Result<Vec<String>, LocatorListError>>,
}

impl DirectiveScan {
    /// Returns the authoritative next-node name, if any.
    #[must_use]
    pub fn next_node(&self) -> Option<&str> {
        self.next_node.as_deref()
    }

    /// Returns `true` when the termination marker is present.
    #[must_use]
    pub const fn terminates(&self) -> bool {
        self.terminate
    }

    /// Returns the decoded locator list, or the decoding failure.
    ///
    /// `None` means no locator tag was present.
    #[must_use]
    pub const fn locators(&self) -> Option<&Result<Vec<String>, LocatorListError>> {
        self.locators.as_ref()
    }

    /// Returns `true` when no marker of any type was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.next_node.is_none() && !self.terminate && self.locators.is_none()
    }

    /// Returns the well-formed directives in marker order: next node,
    /// termination, locators. A malformed locator list is omitted; inspect
    /// [`DirectiveScan::locators`] to observe it.
    #[must_use]
    pub fn directives(&self) -> Vec<Directive> {
        let mut directives = Vec::new();
        if let Some(name) = &self.next_node {
            directives.push(Directive::NextNode(name.clone()));
        }
        if self.terminate {
            directives.push(Directive::Terminate);
        }
        if let Some(Ok(entries)) = &self.locators {
            directives.push(Directive::ExtractedLocators(entries.clone()));
        }
        directives
    }
}

/// Scans agent text for directive markers.
///
/// The parser never evaluates the text it matches; tag bodies are trimmed
/// strings, and the locator body is decoded strictly as JSON data.
///
/// # Examples
///
/// ```
/// use conductor::directive::DirectiveParser;
///
/// let parser = DirectiveParser::default();
/// let scan = parser.scan("try <next_agent>a</next_agent> then <next_agent>b</next_agent>");
/// assert_eq!(scan.next_node(), Some("b"));
/// assert!(!scan.terminates());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveParser {
    markers: DirectiveMarkers,
}

impl DirectiveParser {
    /// Creates a parser for the given markers.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveMarkersError`] when the markers are unusable.
    pub fn new(markers: DirectiveMarkers) -> Result<Self, DirectiveMarkersError> {
        markers.validate()?;
        Ok(Self { markers })
    }

    /// Returns the configured markers.
    #[must_use]
    pub const fn markers(&self) -> &DirectiveMarkers {
        &self.markers
    }

    /// Scans `text` for every marker type.
    #[must_use]
    pub fn scan(&self, text: &str) -> DirectiveScan {
        let next_node = last_tag_body(
            text,
            &self.markers.next_node_open,
            &self.markers.next_node_close,
        )
        .map(str::to_owned);
        let locators = last_tag_body(
            text,
            &self.markers.locators_open,
            &self.markers.locators_close,
        )
        .map(decode_locator_list);

        DirectiveScan {
            next_node,
            terminate: self.terminates(text),
            locators,
        }
    }

    /// Returns `true` when `text` contains the termination marker.
    #[must_use]
    pub fn terminates(&self, text: &str) -> bool {
        text.contains(self.markers.termination.as_str())
    }
}

/// Returns the trimmed body of the last complete, non-empty `open…close`
/// pair in `text`. An opening tag without a closing tag ends the scan.
fn last_tag_body<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let mut rest = text;
    let mut last = None;
    while let Some((_, after_open)) = rest.split_once(open) {
        let Some((body, after_close)) = after_open.split_once(close) else {
            break;
        };
        let trimmed = body.trim();
        if !trimmed.is_empty() {
            last = Some(trimmed);
        }
        rest = after_close;
    }
    last
}

fn decode_locator_list(body: &str) -> Result<Vec<String>, LocatorListError> {
    serde_json::from_str::<Vec<String>>(body).map_err(|error| LocatorListError {
        reason: error.to_string(),
    })
}
