use std::collections::{BTreeMap, BTreeSet};

use crate::network::{Node, NodeId, NodeName};

/// Interns node names into dense [`NodeId`]s.
///
/// IDs are assigned in ascending letter order, so the lowest-index tie-break used by the path
/// search coincides with alphabetical order.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    name2id: BTreeMap<NodeName, NodeId>,
    names: Vec<NodeName>,
}

impl NodeMap {
    pub fn new(names: impl IntoIterator<Item = NodeName>) -> Self {
        let names = names
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let name2id = names
            .iter()
            .enumerate()
            .map(|(i, &name)| (name, NodeId::new(i)))
            .collect();
        Self { name2id, names }
    }

    pub fn id_of(&self, name: NodeName) -> Option<NodeId> {
        self.name2id.get(&name).copied()
    }

    pub fn name_of(&self, id: NodeId) -> Option<NodeName> {
        self.names.get(id.inner()).copied()
    }

    /// Returns one [`Node`] per interned name, in ID order.
    pub fn nodes(&self) -> Vec<Node> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, &name)| Node::new(NodeId::new(i), name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
