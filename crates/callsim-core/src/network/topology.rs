use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use rustc_hash::FxHashMap;

use crate::network::types::{Link, Node, NodeId};
use crate::units::Circuits;

/// The largest number of nodes a topology may hold.
pub const MAX_NODES: usize = 26;

#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) graph: UnGraph<Node, Link>,
    id2idx: FxHashMap<NodeId, NodeIndex>,
}

impl Topology {
    /// Creates a network topology from a list of nodes and links. This function returns an error if
    /// the given nodes and links fail to produce a valid topology.
    ///
    /// Correctness properties:
    ///
    /// - Every node must have a unique ID.
    /// - There are at most [`MAX_NODES`] nodes.
    /// - Every link must have distinct endpoints in `nodes`.
    ///
    /// Nodes without links are allowed. If two links connect the same pair of nodes, the later one
    /// replaces the earlier one.
    pub fn new(nodes: &[Node], links: &[Link]) -> Result<Self, TopologyError> {
        // CORRECTNESS: There are at most `MAX_NODES` nodes.
        if nodes.len() > MAX_NODES {
            return Err(TopologyError::TooManyNodes {
                n: nodes.len(),
                max: MAX_NODES,
            });
        }
        // Graph indices follow ID order so that index scans visit nodes by ascending ID.
        let mut sorted = nodes.to_vec();
        sorted.sort_by_key(|n| n.id);
        let mut g = UnGraph::default();
        let mut id2idx = FxHashMap::default();
        for n in sorted {
            let id = n.id;
            let idx = g.add_node(n);
            if id2idx.insert(id, idx).is_some() {
                // CORRECTNESS: Every node must have a unique ID.
                return Err(TopologyError::DuplicateNodeId(id));
            }
        }
        for &link in links {
            let Link { a, b, .. } = link;
            // CORRECTNESS: Every link must have distinct endpoints in `nodes`.
            if a == b {
                return Err(TopologyError::NodeAdjacentSelf(a));
            }
            let i = *id2idx.get(&a).ok_or(TopologyError::UndeclaredNode(a))?;
            let j = *id2idx.get(&b).ok_or(TopologyError::UndeclaredNode(b))?;
            g.update_edge(i, j, link);
        }
        Ok(Self { graph: g, id2idx })
    }

    pub fn idx_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id2idx.get(&id).copied()
    }

    /// Returns the link between `a` and `b`, if there is one.
    pub fn find_link(&self, a: NodeId, b: NodeId) -> Option<EdgeIndex> {
        let (i, j) = (self.idx_of(a)?, self.idx_of(b)?);
        self.graph.find_edge(i, j)
    }

    /// Returns the link stored at `eidx`.
    ///
    /// PRECONDITION: `eidx` was produced by this topology.
    pub fn link(&self, eidx: EdgeIndex) -> &Link {
        &self.graph[eidx]
    }

    /// Iterates over all links with their indices, in index order.
    pub fn indexed_links(&self) -> impl Iterator<Item = (EdgeIndex, &Link)> + '_ {
        self.graph
            .edge_indices()
            .map(move |eidx| (eidx, &self.graph[eidx]))
    }

    /// The total capacity of every link, indexed by link.
    pub fn capacities(&self) -> Vec<Circuits> {
        self.graph.edge_weights().map(|l| l.capacity).collect()
    }

    delegate::delegate! {
        to self.graph {
            #[call(node_count)]
            pub fn nr_nodes(&self) -> usize;

            #[call(edge_count)]
            pub fn nr_links(&self) -> usize;

            #[call(node_weights)]
            pub fn nodes(&self) -> impl Iterator<Item = &Node>;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Duplicate node ID {0}")]
    DuplicateNodeId(NodeId),

    #[error("Node {0} is connected to itself")]
    NodeAdjacentSelf(NodeId),

    #[error("Node {0} is not declared")]
    UndeclaredNode(NodeId),

    #[error("Too many nodes (got {n}, at most {max} are supported)")]
    TooManyNodes { n: usize, max: usize },
}
