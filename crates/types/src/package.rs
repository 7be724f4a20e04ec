//! Resolved package descriptors and the inbound manifest

use crate::registry::VersionDocument;
use crate::requirement::Requirement;
use pkgtree_errors::{Error, VersionError};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Root package descriptor supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,

    /// Direct dependency requirements, keyed by package name
    #[serde(default)]
    pub dependencies: HashMap<String, String>,
}

/// The resolved, immutable record for one concrete package version.
///
/// `range` records the constraint this version was selected to satisfy,
/// which is not necessarily `=version`. Dependencies are kept in a
/// `BTreeMap` so every consumer observes them in lexicographic order.
#[derive(Debug, Clone)]
pub struct PackageType {
    pub name: String,
    pub version: Version,
    pub range: Requirement,
    pub dependencies: BTreeMap<String, Requirement>,
}

impl PackageType {
    /// Build a descriptor from a registry per-version document, retaining
    /// the requirement that selected it.
    ///
    /// # Errors
    ///
    /// Returns `VersionError` if the document's version string is not a
    /// valid semantic version.
    pub fn from_version_doc(doc: &VersionDocument, range: Requirement) -> Result<Self, Error> {
        Ok(Self {
            name: doc.name.clone(),
            version: parse_version(&doc.version)?,
            range,
            dependencies: parse_dependencies(&doc.dependencies),
        })
    }

    /// Build the root descriptor from a caller-supplied manifest. The
    /// recorded range is "exactly the manifest's own version".
    ///
    /// # Errors
    ///
    /// Returns `VersionError` if the manifest's version string is not a
    /// valid semantic version.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, Error> {
        let version = parse_version(&manifest.version)?;
        let range = Requirement::exact(&version);
        Ok(Self {
            name: manifest.name.clone(),
            version,
            range,
            dependencies: parse_dependencies(&manifest.dependencies),
        })
    }

    /// `name@version` tag for this descriptor
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}[{}]", self.name, self.version, self.range)
    }
}

fn parse_version(input: &str) -> Result<Version, Error> {
    Version::parse(input).map_err(|e| {
        VersionError::Parse {
            input: input.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn parse_dependencies(declared: &HashMap<String, String>) -> BTreeMap<String, Requirement> {
    declared
        .iter()
        .map(|(name, spec)| (name.clone(), Requirement::parse(spec)))
        .collect()
}
