//! Arena-backed dependency tree with redirection aliasing
//!
//! Nodes live in one `Vec` and reference each other by index handle. A node
//! may carry a redirect to another node, making it a pure alias: every read
//! of its descriptor or children forwards to the target. The optimizer uses
//! this to collapse two resolved requirements onto one concrete version
//! without touching ownership anywhere else in the tree.

use crate::builder::BuiltNode;
use pkgtree_types::PackageType;

/// Handle to a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
    ty: PackageType,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    redirect: Option<NodeId>,
}

/// A resolved dependency tree
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding a single root node
    #[must_use]
    pub fn new(root: PackageType) -> Self {
        Self {
            nodes: vec![NodeData {
                ty: root,
                children: Vec::new(),
                parent: None,
                redirect: None,
            }],
            root: NodeId(0),
        }
    }

    /// Flatten an owned [`BuiltNode`] hierarchy into an arena tree,
    /// preserving child order and wiring parent links.
    #[must_use]
    pub fn from_built(built: BuiltNode) -> Self {
        let mut tree = Self::new(built.ty);
        let children: Vec<NodeId> = built
            .children
            .into_iter()
            .map(|child| tree.attach(child, tree.root))
            .collect();
        tree.nodes[tree.root.0].children = children;
        tree
    }

    fn attach(&mut self, built: BuiltNode, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            ty: built.ty,
            children: Vec::new(),
            parent: Some(parent),
            redirect: None,
        });
        let children: Vec<NodeId> = built
            .children
            .into_iter()
            .map(|child| self.attach(child, id))
            .collect();
        self.nodes[id.0].children = children;
        id
    }

    /// Append a child node under `parent`, returning its handle
    pub fn add_child(&mut self, parent: NodeId, ty: PackageType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            ty,
            children: Vec::new(),
            parent: Some(parent),
            redirect: None,
        });
        let target = self.resolve(parent);
        self.nodes[target.0].children.push(id);
        id
    }

    /// The root node handle
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, aliased ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Follow the redirect chain to the node's true identity. The hop
    /// count is bounded by the arena size as a guard against redirect
    /// cycles, which `merge` refuses to create.
    #[must_use]
    pub fn resolve(&self, id: NodeId) -> NodeId {
        let mut current = id;
        let mut hops = 0;
        while let Some(next) = self.nodes[current.0].redirect {
            current = next;
            hops += 1;
            if hops > self.nodes.len() {
                debug_assert!(false, "redirect cycle in tree");
                break;
            }
        }
        current
    }

    /// The resolved descriptor for a node
    #[must_use]
    pub fn package(&self, id: NodeId) -> &PackageType {
        &self.nodes[self.resolve(id).0].ty
    }

    /// The resolved child list for a node
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[self.resolve(id).0].children
    }

    /// Replace the resolved child list for a node
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        let target = self.resolve(id);
        self.nodes[target.0].children = children;
    }

    /// Non-owning parent handle, if any (diagnostics only)
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Whether this node itself is an alias
    #[must_use]
    pub fn is_reference(&self, id: NodeId) -> bool {
        self.nodes[id.0].redirect.is_some()
    }

    /// Resolved `name@version` tag for a node
    #[must_use]
    pub fn tag(&self, id: NodeId) -> String {
        self.package(id).tag()
    }

    /// Redirect `from` onto `to` when `from`'s recorded range admits `to`'s
    /// concrete version. Returns whether the merge happened.
    ///
    /// Both handles are resolved before the compatibility test; the
    /// redirect is recorded on the raw `from` handle. A merge that would
    /// close a redirect cycle is refused.
    pub fn merge(&mut self, from: NodeId, to: NodeId) -> bool {
        let own = self.resolve(from);
        let other = self.resolve(to);
        if own == other || self.chain_contains(to, from) {
            return false;
        }

        let admits = {
            let own_ty = &self.nodes[own.0].ty;
            let other_ty = &self.nodes[other.0].ty;
            own_ty.range.satisfies(&other_ty.version)
        };
        if admits {
            tracing::debug!(
                from = %self.nodes[own.0].ty,
                to = %self.nodes[other.0].ty,
                "merging node"
            );
            self.nodes[from.0].redirect = Some(to);
        }
        admits
    }

    /// Whether `target` appears anywhere on `start`'s redirect chain
    fn chain_contains(&self, start: NodeId, target: NodeId) -> bool {
        let mut current = start;
        let mut hops = 0;
        loop {
            if current == target {
                return true;
            }
            match self.nodes[current.0].redirect {
                Some(next) if hops <= self.nodes.len() => {
                    current = next;
                    hops += 1;
                }
                _ => return false,
            }
        }
    }
}
