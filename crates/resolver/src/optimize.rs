//! Compatible-version merging pass
//!
//! Walks the built tree in pre-order and merges nodes of the same package
//! name whose requirements are mutually satisfiable, so two requirements
//! that both admit one concrete version converge on a single node instead
//! of two separate subtrees. Merging is pure redirection over nodes that
//! already exist; nothing is re-fetched or re-built.

use crate::tree::{NodeId, Tree};
use std::collections::HashMap;

/// Merge compatible duplicate nodes in place
pub fn optimize(tree: &mut Tree) {
    let mut by_name: HashMap<String, Vec<NodeId>> = HashMap::new();
    visit(tree, tree.root(), &mut by_name);
}

fn visit(tree: &mut Tree, node: NodeId, by_name: &mut HashMap<String, Vec<NodeId>>) {
    let name = tree.package(node).name.clone();
    let seen = by_name.remove(&name).unwrap_or_default();

    // Either direction may satisfy the other's constraint. The seen-list
    // keeps only the entries still compatible with the latest arrival,
    // plus the arrival itself.
    let mut kept: Vec<NodeId> = seen
        .into_iter()
        .filter(|&other| tree.merge(node, other) || tree.merge(other, node))
        .collect();
    kept.push(node);
    by_name.insert(name, kept);

    // An aliased node's children belong to its target and are visited
    // through the target, not independently.
    if !tree.is_reference(node) {
        let children = tree.children(node).to_vec();
        for child in children {
            visit(tree, child, by_name);
        }
    }
}
