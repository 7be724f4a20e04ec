//! Version parsing error types

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum VersionError {
    #[error("invalid version {input}: {message}")]
    Parse { input: String, message: String },
}
