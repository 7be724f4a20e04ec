//! Network-related error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("registry returned HTTP {status} for {name}")]
    RegistryStatus { status: u16, name: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
