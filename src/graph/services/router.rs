//! The Router: decides which node runs next.

use crate::conversation::domain::ConversationState;
use crate::directive::DirectiveParser;
use crate::graph::domain::{NodeName, Topology};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Execute the named node next.
    Node(NodeName),
    /// The run is complete.
    Terminate,
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(name) => write!(formatter, "{name}"),
            Self::Terminate => formatter.write_str("terminate"),
        }
    }
}

/// Fatal routing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingError {
    /// No directive named a next node and nothing else applies.
    #[error("node '{from}' gave no next node")]
    NoNextNode {
        /// Node that just ran.
        from: NodeName,
    },

    /// The chosen node is not in the current node's allow-list.
    #[error("node '{from}' may not hand control to '{to}'")]
    NotAllowed {
        /// Node that just ran.
        from: NodeName,
        /// Requested next node.
        to: String,
    },

    /// The directive names a node the graph does not declare.
    #[error("node '{from}' named unknown node '{name}'")]
    UnknownNode {
        /// Node that just ran.
        from: NodeName,
        /// Name as written in the directive.
        name: String,
    },
}

/// Pure routing function over the topology and the conversation state.
///
/// Rules, first match wins:
///
/// 1. When the last message has pending invocations, route to the dispatch
///    node.
/// 2. When the node that just ran is the dispatch node, control returns to
///    `state.sender()`, the node that requested the invocations. Markers in
///    capability results are not honoured.
/// 3. When the last message carries the termination marker, terminate.
/// 4. Otherwise route to `state.next_role()`, or fail when it is unset.
///
/// Every node-valued route is checked against the allow-list of the node
/// that just ran.
#[derive(Debug, Clone)]
pub struct Router {
    topology: Arc<Topology>,
    parser: DirectiveParser,
}

impl Router {
    /// Creates a router.
    #[must_use]
    pub const fn new(topology: Arc<Topology>, parser: DirectiveParser) -> Self {
        Self { topology, parser }
    }

    /// Returns the topology routes are checked against.
    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Decides what follows the step that `current` just executed.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError`] when no next node is set, the named node is
    /// undeclared, or it is outside the allow-list of `current`.
    pub fn route(
        &self,
        current: &NodeName,
        state: &ConversationState,
    ) -> Result<Route, RoutingError> {
        let last = state.last_message();
        if last.is_some_and(|message| message.has_pending_invocations()) {
            return self.checked(current, self.topology.dispatch().clone());
        }
        if current == self.topology.dispatch() {
            return self.checked(current, state.sender().clone());
        }
        if last.is_some_and(|message| self.parser.terminates(message.content())) {
            return Ok(Route::Terminate);
        }

        let raw = state.next_role().ok_or_else(|| RoutingError::NoNextNode {
            from: current.clone(),
        })?;
        let target = self
            .topology
            .resolve(raw)
            .ok_or_else(|| RoutingError::UnknownNode {
                from: current.clone(),
                name: raw.to_owned(),
            })?;
        self.checked(current, target.clone())
    }

    fn checked(&self, from: &NodeName, to: NodeName) -> Result<Route, RoutingError> {
        if self.topology.allows(from, &to) {
            Ok(Route::Node(to))
        } else {
            Err(RoutingError::NotAllowed {
                from: from.clone(),
                to: to.to_string(),
            })
        }
    }
}
