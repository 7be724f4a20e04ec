//! Output rendering for resolved trees

use pkgtree_resolver::Tree;
use std::fmt::Write as _;

/// Render the indented human-readable form, one node per line as
/// `name@version (from range)`.
pub fn render_tree(tree: &Tree) -> String {
    let mut out = String::new();
    render_node(tree, tree.root(), "", &mut out);
    out
}

fn render_node(tree: &Tree, id: pkgtree_resolver::NodeId, indent: &str, out: &mut String) {
    let ty = tree.package(id);
    let _ = writeln!(out, "{indent}{}@{} (from {})", ty.name, ty.version, ty.range);

    let child_indent = format!("{indent}  ");
    for &child in tree.children(id) {
        render_node(tree, child, &child_indent, out);
    }
}

/// Render the newline-delimited streaming form, children before the
/// parents that reference them.
///
/// # Errors
///
/// Returns an error if a line fails to serialize.
pub fn render_ndjson(tree: &Tree) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for line in tree.stream_lines() {
        out.push_str(&serde_json::to_string(&line)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgtree_types::{Manifest, PackageType, Requirement};
    use std::collections::HashMap;

    fn sample_tree() -> Tree {
        let manifest = Manifest {
            name: "root".to_string(),
            version: "1.0.0".to_string(),
            dependencies: HashMap::new(),
        };
        let mut tree = Tree::new(PackageType::from_manifest(&manifest).unwrap());

        let dep = Manifest {
            name: "a".to_string(),
            version: "1.2.0".to_string(),
            dependencies: HashMap::new(),
        };
        let mut ty = PackageType::from_manifest(&dep).unwrap();
        ty.range = Requirement::parse("^1.0.0");
        tree.add_child(tree.root(), ty);
        tree
    }

    #[test]
    fn renders_indented_tags_with_ranges() {
        let rendered = render_tree(&sample_tree());
        assert_eq!(rendered, "root@1.0.0 (from =1.0.0)\n  a@1.2.0 (from ^1.0.0)\n");
    }

    #[test]
    fn renders_one_json_object_per_line() {
        let rendered = render_ndjson(&sample_tree()).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "a");
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["refs"][0], "a@1.2.0");
    }
}
