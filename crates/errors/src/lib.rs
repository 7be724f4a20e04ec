#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for pkgtree
//!
//! Fine-grained error types organized by domain. All error types are
//! `Clone` because a failed registry fetch is shared verbatim with every
//! caller coalesced onto the same in-flight request.

use thiserror::Error;

pub mod config;
pub mod network;
pub mod resolve;
pub mod version;

pub use config::ConfigError;
pub use network::NetworkError;
pub use resolve::ResolveError;
pub use version::VersionError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("version error: {0}")]
    Version(#[from] VersionError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error with a message
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable kind tag for boundary payloads
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(NetworkError::Transport(_)) => "transport_error",
            Self::Network(NetworkError::RegistryStatus { .. }) => "registry_error",
            Self::Network(NetworkError::InvalidUrl(_)) => "invalid_url",
            Self::Resolve(ResolveError::NoMatchingVersion { .. }) => "no_matching_version",
            Self::Resolve(ResolveError::MissingVersionData { .. }) => "missing_version_data",
            Self::Resolve(ResolveError::CyclicDependency { .. }) => "cyclic_dependency",
            Self::Version(_) => "version_error",
            Self::Config(_) => "config_error",
            Self::Internal(_) => "internal_error",
        }
    }
}
