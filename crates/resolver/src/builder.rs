//! Recursive tree construction against the metadata cache

use futures::future::{try_join_all, BoxFuture, FutureExt};
use pkgtree_errors::{Error, ResolveError, VersionError};
use pkgtree_registry::MetaCache;
use pkgtree_types::{select_highest, PackageType, Requirement, Version};

/// Owned output of the build phase, flattened into a [`crate::Tree`]
/// afterwards
#[derive(Debug)]
pub struct BuiltNode {
    pub ty: PackageType,
    pub children: Vec<BuiltNode>,
}

/// Expands a root descriptor into a full dependency tree
#[derive(Clone)]
pub struct TreeBuilder {
    cache: MetaCache,
}

impl TreeBuilder {
    /// Create a builder over a shared metadata cache
    #[must_use]
    pub fn new(cache: MetaCache) -> Self {
        Self { cache }
    }

    /// Build the full tree below `root`.
    ///
    /// # Errors
    ///
    /// Fails on the first unresolvable dependency, inconsistent registry
    /// document, fetch failure, or cyclic dependency chain.
    pub async fn build(&self, root: PackageType) -> Result<BuiltNode, Error> {
        self.build_node(root, Vec::new()).await
    }

    /// Resolve one declared dependency into a concrete descriptor.
    ///
    /// Tags are looked up in the registry's `dist-tags` mapping and
    /// recorded as an exact range; parsed ranges select the highest
    /// published version that satisfies them and are recorded verbatim.
    ///
    /// # Errors
    ///
    /// `NoMatchingVersion` when nothing satisfies the requirement or the
    /// tag is absent; `MissingVersionData` when the registry lists the
    /// selected version without a per-version document.
    pub async fn resolve_dependency(
        &self,
        name: &str,
        requirement: &Requirement,
    ) -> Result<PackageType, Error> {
        let doc = self.cache.fetch(name).await?;

        let (version, range) = match requirement {
            Requirement::Tag(tag) => {
                let resolved =
                    doc.dist_tags
                        .get(tag)
                        .ok_or_else(|| ResolveError::NoMatchingVersion {
                            name: name.to_string(),
                            requirement: tag.clone(),
                        })?;
                let version = Version::parse(resolved).map_err(|e| VersionError::Parse {
                    input: resolved.clone(),
                    message: e.to_string(),
                })?;
                let range = Requirement::exact(&version);
                (version, range)
            }
            Requirement::Range(req) => {
                // Version keys that do not parse cannot match any range.
                let candidates = doc
                    .versions
                    .keys()
                    .filter_map(|v| Version::parse(v).ok());
                let version = select_highest(candidates, req).ok_or_else(|| {
                    ResolveError::NoMatchingVersion {
                        name: name.to_string(),
                        requirement: req.to_string(),
                    }
                })?;
                (version, requirement.clone())
            }
        };

        tracing::debug!(name, %version, %requirement, "resolved dependency");

        let version_doc = doc.versions.get(&version.to_string()).ok_or_else(|| {
            ResolveError::MissingVersionData {
                name: name.to_string(),
                version: version.to_string(),
            }
        })?;

        PackageType::from_version_doc(version_doc, range)
    }

    fn build_node(
        &self,
        ty: PackageType,
        chain: Vec<String>,
    ) -> BoxFuture<'_, Result<BuiltNode, Error>> {
        async move {
            if chain.contains(&ty.name) {
                let mut full = chain;
                full.push(ty.name.clone());
                return Err(ResolveError::CyclicDependency { chain: full }.into());
            }

            tracing::debug!(package = %ty, "building node");

            // BTreeMap iteration gives the deterministic lexicographic
            // order; try_join_all keeps results in that order while the
            // fetches run concurrently.
            let resolved = try_join_all(
                ty.dependencies
                    .iter()
                    .map(|(name, requirement)| self.resolve_dependency(name, requirement)),
            )
            .await?;

            let mut child_chain = chain;
            child_chain.push(ty.name.clone());

            let children = try_join_all(
                resolved
                    .into_iter()
                    .map(|dep| self.build_node(dep, child_chain.clone())),
            )
            .await?;

            Ok(BuiltNode { ty, children })
        }
        .boxed()
    }
}
