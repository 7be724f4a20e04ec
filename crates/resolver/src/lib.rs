#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Dependency tree resolution for pkgtree
//!
//! Given a root manifest, this crate expands the transitive dependency
//! graph against the registry metadata cache, then rewrites the result into
//! a compact tree: compatible duplicate versions are merged by aliasing,
//! and repeated `name@version` appearances are pruned before serialization.

mod builder;
mod optimize;
mod prune;
mod serialize;
mod tree;

pub use builder::{BuiltNode, TreeBuilder};
pub use optimize::optimize;
pub use prune::prune;
pub use serialize::{StreamLine, TreeDoc};
pub use tree::{NodeId, Tree};

use pkgtree_errors::Error;
use pkgtree_registry::MetaCache;
use pkgtree_types::{Manifest, PackageType};

/// Resolve a manifest into its optimized, pruned dependency tree.
///
/// # Errors
///
/// Fails with the first resolution error encountered: unreachable registry,
/// unsatisfiable requirement, inconsistent registry data, or a cyclic
/// dependency chain. There is no partial-tree result.
pub async fn resolve_manifest(cache: &MetaCache, manifest: &Manifest) -> Result<Tree, Error> {
    let root = PackageType::from_manifest(manifest)?;
    let built = TreeBuilder::new(cache.clone()).build(root).await?;

    let mut tree = Tree::from_built(built);
    optimize(&mut tree);
    prune(&mut tree);
    Ok(tree)
}
