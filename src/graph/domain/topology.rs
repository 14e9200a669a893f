//! Static node set and adjacency allow-list.

use super::{NodeKind, NodeName, TopologyError};
use std::collections::{BTreeMap, BTreeSet};

/// Validated orchestration topology.
///
/// Every node has an explicit set of legal next nodes. A routing decision
/// naming a node outside that set is rejected rather than honoured. The
/// capability dispatch node's allow-list is derived: it may return control
/// to every node that is allowed to call it.
///
/// # Examples
///
/// ```
/// use conductor::graph::domain::{NodeKind, Topology};
///
/// let topology = Topology::builder()
///     .node("supervisor", NodeKind::Supervisor)
///     .node("paper_team_leader", NodeKind::TeamLeader)
///     .node("call_tool", NodeKind::Dispatch)
///     .edge("supervisor", "paper_team_leader")
///     .edge("paper_team_leader", "supervisor")
///     .edge("paper_team_leader", "call_tool")
///     .entry("supervisor")
///     .build()
///     .expect("valid topology");
///
/// assert!(topology.allows_names("call_tool", "paper_team_leader"));
/// assert!(!topology.allows_names("supervisor", "call_tool"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    entry: NodeName,
    dispatch: NodeName,
    kinds: BTreeMap<NodeName, NodeKind>,
    edges: BTreeMap<NodeName, BTreeSet<NodeName>>,
}

impl Topology {
    /// Returns a builder for a new topology.
    #[must_use]
    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::default()
    }

    /// Returns the entry node (the supervisor).
    #[must_use]
    pub const fn entry(&self) -> &NodeName {
        &self.entry
    }

    /// Returns the capability dispatch node.
    #[must_use]
    pub const fn dispatch(&self) -> &NodeName {
        &self.dispatch
    }

    /// Returns the kind of a declared node.
    #[must_use]
    pub fn kind(&self, node: &NodeName) -> Option<NodeKind> {
        self.kinds.get(node).copied()
    }

    /// Resolves a raw name (for example from a directive) to a declared node.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<&NodeName> {
        let candidate = NodeName::new(raw).ok()?;
        self.kinds.get_key_value(&candidate).map(|(name, _)| name)
    }

    /// Returns `true` when `to` is in the allow-list of `from`.
    #[must_use]
    pub fn allows(&self, from: &NodeName, to: &NodeName) -> bool {
        self.edges
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    /// String-keyed variant of [`Topology::allows`].
    #[must_use]
    pub fn allows_names(&self, from: &str, to: &str) -> bool {
        match (self.resolve(from), self.resolve(to)) {
            (Some(source), Some(target)) => self.allows(source, target),
            _ => false,
        }
    }

    /// Returns the legal next nodes of `from` in name order.
    #[must_use]
    pub fn successors(&self, from: &NodeName) -> Vec<&NodeName> {
        self.edges
            .get(from)
            .map(|targets| targets.iter().collect())
            .unwrap_or_default()
    }

    /// Iterates over declared nodes and their kinds in name order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeName, NodeKind)> {
        self.kinds.iter().map(|(name, kind)| (name, *kind))
    }
}

/// Builder collecting node and edge declarations before validation.
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    nodes: Vec<(String, NodeKind)>,
    edges: Vec<(String, String)>,
    entry: Option<String>,
}

impl TopologyBuilder {
    /// Declares a node.
    #[must_use]
    pub fn node(mut self, name: impl Into<String>, kind: NodeKind) -> Self {
        self.nodes.push((name.into(), kind));
        self
    }

    /// Declares a legal transition.
    #[must_use]
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Sets the entry node.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Validates the declarations and builds the topology.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError`] when a name is invalid or duplicated, the
    /// entry is missing or not the supervisor, the graph does not have
    /// exactly one supervisor and one dispatch node, an edge references an
    /// undeclared node, or an edge leaves the dispatch node.
    pub fn build(self) -> Result<Topology, TopologyError> {
        let kinds = collect_nodes(self.nodes)?;

        let supervisors = count_kind(&kinds, NodeKind::Supervisor);
        if supervisors != 1 {
            return Err(TopologyError::SupervisorCount(supervisors));
        }
        let dispatch = single_dispatch(&kinds)?;

        let raw_entry = self.entry.ok_or(TopologyError::MissingEntry)?;
        let entry = NodeName::new(raw_entry.as_str())?;
        let entry_kind = kinds
            .get(&entry)
            .copied()
            .ok_or_else(|| TopologyError::UnknownEntry(raw_entry.clone()))?;
        if entry_kind != NodeKind::Supervisor {
            return Err(TopologyError::EntryNotSupervisor {
                name: entry.to_string(),
                kind: entry_kind.to_string(),
            });
        }

        let mut edges: BTreeMap<NodeName, BTreeSet<NodeName>> = kinds
            .keys()
            .map(|name| (name.clone(), BTreeSet::new()))
            .collect();
        for (raw_from, raw_to) in self.edges {
            let from = NodeName::new(raw_from.as_str())?;
            let to = NodeName::new(raw_to.as_str())?;
            if !kinds.contains_key(&from) {
                return Err(TopologyError::UnknownEdgeSource {
                    from: raw_from,
                    to: raw_to,
                });
            }
            if !kinds.contains_key(&to) {
                return Err(TopologyError::UnknownEdgeTarget {
                    from: raw_from,
                    to: raw_to,
                });
            }
            if from == dispatch {
                return Err(TopologyError::DispatchEdgeDeclared(dispatch.to_string()));
            }
            edges.entry(from).or_default().insert(to);
        }

        let callers: BTreeSet<NodeName> = edges
            .iter()
            .filter(|(_, targets)| targets.contains(&dispatch))
            .map(|(name, _)| name.clone())
            .collect();
        edges.insert(dispatch.clone(), callers);

        Ok(Topology {
            entry,
            dispatch,
            kinds,
            edges,
        })
    }
}

fn collect_nodes(
    declared: Vec<(String, NodeKind)>,
) -> Result<BTreeMap<NodeName, NodeKind>, TopologyError> {
    let mut kinds = BTreeMap::new();
    for (raw, kind) in declared {
        let name = NodeName::new(raw.as_str())?;
        if kinds.insert(name, kind).is_some() {
            return Err(TopologyError::DuplicateNode(raw));
        }
    }
    Ok(kinds)
}

fn count_kind(kinds: &BTreeMap<NodeName, NodeKind>, wanted: NodeKind) -> usize {
    kinds.values().filter(|kind| **kind == wanted).count()
}

fn single_dispatch(kinds: &BTreeMap<NodeName, NodeKind>) -> Result<NodeName, TopologyError> {
    let mut dispatch_nodes = kinds
        .iter()
        .filter(|(_, kind)| **kind == NodeKind::Dispatch)
        .map(|(name, _)| name.clone());
    match (dispatch_nodes.next(), dispatch_nodes.next()) {
        (Some(name), None) => Ok(name),
        (None, _) => Err(TopologyError::DispatchCount(0)),
        (Some(_), Some(_)) => Err(TopologyError::DispatchCount(
            count_kind(kinds, NodeKind::Dispatch),
        )),
    }
}
