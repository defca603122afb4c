use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::tree::{Colour, LabeledTree, NodeId};

/// Computes a deterministic string signature for `tree` (spec §4.4.3).
///
/// Two trees with identical signatures are treated as the same macro-state. The signature
/// embeds, per node in pre-order, an id, the state-label, and the colour. Unlike the source
/// algorithm, node IDs are **renumbered by the pre-order walk itself** before being emitted
/// (spec §9 "Open question — signature canonicalisation"): the source embeds the raw arena
/// IDs, so two structurally identical trees that happened to allocate nodes in a different
/// order during macro-step construction would hash to different signatures and spuriously
/// split into distinct macro-states. Renumbering fixes that without changing anything else
/// about the signature's shape.
pub fn tree_signature(tree: &LabeledTree) -> String {
    let mut renumber: BTreeMap<NodeId, u64> = BTreeMap::new();
    let mut next = 0u64;
    let mut out = String::new();
    visit(tree, tree.root(), &mut renumber, &mut next, &mut out);
    out
}

fn visit(
    tree: &LabeledTree,
    id: NodeId,
    renumber: &mut BTreeMap<NodeId, u64>,
    next: &mut u64,
    out: &mut String,
) {
    let Some(node) = tree.node(id) else { return };
    let canonical = *next;
    *next += 1;
    renumber.insert(id, canonical);

    let _ = write!(out, "{canonical}:");
    let label = node
        .state_label
        .iter()
        .map(|s| s.index().to_string())
        .collect::<Vec<_>>()
        .join(",");
    let _ = write!(out, "{label}:{}:", colour_code(node.colour));

    for &child in &node.children {
        visit(tree, child, renumber, next, out);
    }
    out.push(';');
}

fn colour_code(colour: Colour) -> &'static str {
    match colour {
        Colour::White => "W",
        Colour::Red => "R",
        Colour::Green => "G",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use automata_core::RabinAutomaton;

    use super::*;

    #[test]
    fn identical_shape_same_signature_regardless_of_allocation_order() {
        let mut plant = RabinAutomaton::new("plant");
        let s0 = plant.add_state();
        let s1 = plant.add_state();

        let mut a = LabeledTree::singleton(BTreeSet::from([s0, s1]));
        let root_a = a.root();
        let child_a1 = a.create_node();
        let child_a2 = a.create_node();
        a.node_mut(root_a).unwrap().children = vec![child_a1, child_a2];
        a.node_mut(child_a1).unwrap().state_label = BTreeSet::from([s0]);
        a.node_mut(child_a2).unwrap().state_label = BTreeSet::from([s1]);

        // Same shape, but built with children created/linked in the opposite order, so raw
        // arena IDs land on the children in reverse compared to `a`.
        let mut b = LabeledTree::singleton(BTreeSet::from([s0, s1]));
        let root_b = b.root();
        let _decoy = b.create_node();
        let child_b2 = b.create_node();
        let child_b1 = b.create_node();
        b.delete_node(_decoy);
        b.node_mut(root_b).unwrap().children = vec![child_b1, child_b2];
        b.node_mut(child_b1).unwrap().state_label = BTreeSet::from([s0]);
        b.node_mut(child_b2).unwrap().state_label = BTreeSet::from([s1]);

        assert_eq!(tree_signature(&a), tree_signature(&b));
    }

    #[test]
    fn different_colours_yield_different_signatures() {
        let mut plant = RabinAutomaton::new("plant");
        let s0 = plant.add_state();
        let mut tree = LabeledTree::singleton(BTreeSet::from([s0]));
        let before = tree_signature(&tree);
        tree.node_mut(tree.root()).unwrap().colour = Colour::Red;
        let after = tree_signature(&tree);
        assert_ne!(before, after);
    }
}
