//! Resolution error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("could not find {name}@{requirement}")]
    NoMatchingVersion { name: String, requirement: String },

    #[error("missing versions{{}} data for {name}@{version}")]
    MissingVersionData { name: String, version: String },

    #[error("recursive dependency chain: {}", .chain.join(" -> "))]
    CyclicDependency { chain: Vec<String> },
}
