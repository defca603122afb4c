use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use automata_core::StateId;

/// Identifier for a [`TreeNode`] within the [`LabeledTree`] that allocated it. Monotonically
/// increasing within a tree, so an ordered child [`Vec`] doubles as an age order without a
/// separate timestamp field (spec §9 "Age ordering").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A Safra-tree node's colour (spec §3, §9 "Colour as tagged variant").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    White,
    Red,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub state_label: BTreeSet<StateId>,
    pub children: Vec<NodeId>,
    pub colour: Colour,
    pub a_set: BTreeSet<NodeId>,
    pub r_set: BTreeSet<NodeId>,
}

impl TreeNode {
    fn new() -> Self {
        Self {
            state_label: BTreeSet::new(),
            children: Vec::new(),
            colour: Colour::White,
            a_set: BTreeSet::new(),
            r_set: BTreeSet::new(),
        }
    }
}

/// A finite rooted ordered tree whose nodes are records in an arena keyed by monotonically
/// increasing [`NodeId`]s (spec §9): all cross-references — parent/child links and the A-/R-set
/// back-references used for acceptance tracking — are IDs, never direct pointers, so deletion
/// is a cascading sweep rather than a borrow-checker puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledTree {
    nodes: BTreeMap<NodeId, TreeNode>,
    root: NodeId,
    next_id: u64,
}

impl LabeledTree {
    /// Single-node tree whose root carries `label` (spec §4.4.1).
    pub fn singleton(label: BTreeSet<StateId>) -> Self {
        let mut tree = Self {
            nodes: BTreeMap::new(),
            root: NodeId(0),
            next_id: 0,
        };
        let root = tree.create_node();
        tree.nodes.get_mut(&root).unwrap().state_label = label;
        tree.root = root;
        tree
    }

    pub fn create_node(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, TreeNode::new());
        id
    }

    /// Removes `id` from the tree and from every other node's child list and A-/R-sets. A
    /// no-op if `id` is not (or no longer) present.
    pub fn delete_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_none() {
            return;
        }
        for node in self.nodes.values_mut() {
            node.a_set.remove(&id);
            node.r_set.remove(&id);
            node.children.retain(|&c| c != id);
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Node IDs in ascending (= creation) order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().map(|(&id, n)| (id, n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use automata_core::RabinAutomaton;

    use super::*;

    #[test]
    fn delete_node_cascades_to_references() {
        let mut plant = RabinAutomaton::new("plant");
        let s0 = plant.add_state();

        let mut tree = LabeledTree::singleton(BTreeSet::from([s0]));
        let root = tree.root();
        let child = tree.create_node();
        tree.node_mut(root).unwrap().children.push(child);
        tree.node_mut(root).unwrap().a_set.insert(child);

        tree.delete_node(child);

        assert!(!tree.contains(child));
        assert!(tree.node(root).unwrap().children.is_empty());
        assert!(tree.node(root).unwrap().a_set.is_empty());
    }
}
