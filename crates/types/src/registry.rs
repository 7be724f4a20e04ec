//! Serde models of the registry metadata documents
//!
//! A package's metadata lives at `<registry>/<name>` and maps distribution
//! tags to versions and versions to their full per-version documents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level registry metadata document for one package name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaDocument {
    /// Distribution tag to concrete version mapping (e.g. `latest`)
    #[serde(default, rename = "dist-tags")]
    pub dist_tags: HashMap<String, String>,

    /// Published versions, keyed by version string
    #[serde(default)]
    pub versions: HashMap<String, VersionDocument>,
}

/// Per-version document inside `versions {}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionDocument {
    pub name: String,
    pub version: String,

    /// Declared dependency ranges (or tags), keyed by package name
    #[serde(default)]
    pub dependencies: HashMap<String, String>,
}
