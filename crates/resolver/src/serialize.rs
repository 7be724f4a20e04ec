//! External read contract for resolved trees
//!
//! Two serialized forms: the recursive single-document shape and a
//! newline-delimited streaming shape where every child line is written
//! before the parent line that references it by tag.

use crate::tree::{NodeId, Tree};
use serde::Serialize;

/// Recursive `{name, version, children}` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeDoc {
    pub name: String,
    pub version: String,
    pub children: Vec<TreeDoc>,
}

/// One line of the streaming form: a node and the tags of its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamLine {
    pub name: String,
    pub version: String,
    pub refs: Vec<String>,
}

impl Tree {
    /// Serialize the whole tree as one recursive document
    #[must_use]
    pub fn to_doc(&self) -> TreeDoc {
        self.doc_for(self.root())
    }

    fn doc_for(&self, id: NodeId) -> TreeDoc {
        let ty = self.package(id);
        TreeDoc {
            name: ty.name.clone(),
            version: ty.version.to_string(),
            children: self
                .children(id)
                .iter()
                .map(|&child| self.doc_for(child))
                .collect(),
        }
    }

    /// Emit the tree post-order, children before the parents that
    /// reference them
    #[must_use]
    pub fn stream_lines(&self) -> Vec<StreamLine> {
        let mut lines = Vec::new();
        self.emit(self.root(), &mut lines);
        lines
    }

    fn emit(&self, id: NodeId, lines: &mut Vec<StreamLine>) {
        let children = self.children(id).to_vec();
        for &child in &children {
            self.emit(child, lines);
        }

        let ty = self.package(id);
        lines.push(StreamLine {
            name: ty.name.clone(),
            version: ty.version.to_string(),
            refs: children.iter().map(|&child| self.tag(child)).collect(),
        });
    }
}
