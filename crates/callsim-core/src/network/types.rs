use petgraph::graph::EdgeIndex;

use crate::units::{Circuits, Millisecs};

identifier!(NodeId, usize);

/// The external name of a node: a single uppercase letter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub struct NodeName(char);

impl NodeName {
    /// Creates a node name, rejecting anything outside `'A'..='Z'`.
    pub fn new(c: char) -> Result<Self, NodeNameError> {
        if c.is_ascii_uppercase() {
            Ok(Self(c))
        } else {
            Err(NodeNameError(c.to_string()))
        }
    }

    /// Returns the letter.
    pub const fn letter(self) -> char {
        self.0
    }
}

impl TryFrom<char> for NodeName {
    type Error = NodeNameError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::new(c)
    }
}

impl From<NodeName> for char {
    fn from(name: NodeName) -> char {
        name.0
    }
}

impl std::str::FromStr for NodeName {
    type Err = NodeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(NodeNameError(s.to_owned())),
        }
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node name outside the supported alphabet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node name {0:?} (expected a single letter A-Z)")]
pub struct NodeNameError(String);

#[derive(Debug, Clone, PartialEq, Eq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: NodeName,
}

/// A bidirectional link. Capacity is shared by both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub delay: Millisecs,
    pub capacity: Circuits,
}

impl Link {
    pub fn new(
        a: NodeId,
        b: NodeId,
        delay: impl Into<Millisecs>,
        capacity: impl Into<Circuits>,
    ) -> Self {
        Self {
            a,
            b,
            delay: delay.into(),
            capacity: capacity.into(),
        }
    }

    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        self.a == x && self.b == y || self.a == y && self.b == x
    }
}

/// A route selected for a call, from source to destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) links: Vec<EdgeIndex>,
    pub(crate) delay: f64,
}

impl Route {
    /// The number of links traversed.
    pub fn nr_hops(&self) -> usize {
        self.links.len()
    }

    /// Total propagation delay along the route, in milliseconds.
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// The visited nodes, source first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The traversed links, in order from the source.
    pub fn links(&self) -> &[EdgeIndex] {
        &self.links
    }
}
