//! Duplicate-subtree pruning pass
//!
//! After merging, the same `name@version` can be reachable through several
//! parents. This pass walks the alias-resolved tree depth-first with one
//! running set of already-emitted tags and drops any child whose tag was
//! emitted earlier, leaving a tree that serializes without duplicated
//! expansion. Already-satisfied transitive edges therefore appear at most
//! once in the output.

use crate::tree::{NodeId, Tree};
use std::collections::HashSet;

/// Strip repeated `name@version` appearances in place. Idempotent.
pub fn prune(tree: &mut Tree) {
    let mut known: HashSet<String> = HashSet::new();
    visit(tree, tree.root(), &mut known);
}

fn visit(tree: &mut Tree, node: NodeId, known: &mut HashSet<String>) {
    let children = tree.children(node).to_vec();
    let mut surviving = Vec::with_capacity(children.len());

    for child in children {
        let tag = tree.tag(child);
        if known.insert(tag) {
            surviving.push(child);
        } else {
            tracing::debug!(tag = %tree.tag(child), "dropping duplicate subtree");
        }
    }

    tree.set_children(node, surviving.clone());
    for child in surviving {
        visit(tree, child, known);
    }
}
