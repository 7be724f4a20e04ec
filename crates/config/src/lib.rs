#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration for pkgtree
//!
//! Boundary-only settings: which registry to resolve against and where the
//! HTTP listener binds. Precedence is defaults, then the TOML config file,
//! then `PKGTREE_*` environment variables, then CLI flags (applied by the
//! binary).

use pkgtree_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default public registry root
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// Default listener address for `pkgtree serve`
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Registry section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    #[serde(default = "default_registry_url")]
    pub url: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
        }
    }
}

/// Server section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub server: ServerSection,
}

impl Config {
    /// Default config file path (`~/.config/pkgtree/config.toml`)
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pkgtree").join("config.toml"))
    }

    /// Load configuration from a specific TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid
    /// TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

        toml::from_str(&contents)
            .map_err(|e| {
                ConfigError::Invalid {
                    message: e.to_string(),
                }
                .into()
            })
    }

    /// Load from an explicit path, or from the default path when it
    /// exists, or fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::load_from_file(path).await;
        }

        match Self::default_path() {
            Some(default) if default.exists() => Self::load_from_file(&default).await,
            _ => Ok(Self::default()),
        }
    }

    /// Apply `PKGTREE_*` environment overrides
    pub fn merge_env(&mut self) {
        if let Ok(url) = std::env::var("PKGTREE_REGISTRY") {
            tracing::debug!(url, "registry URL overridden from environment");
            self.registry.url = url;
        }

        if let Ok(listen) = std::env::var("PKGTREE_LISTEN") {
            self.server.listen = listen;
        }
    }
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_public_registry() {
        let config = Config::default();
        assert_eq!(config.registry.url, DEFAULT_REGISTRY);
        assert_eq!(config.server.listen, DEFAULT_LISTEN);
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[registry]\nurl = \"http://localhost:4873/\"").unwrap();

        let config = Config::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.registry.url, "http://localhost:4873/");
        assert_eq!(config.server.listen, DEFAULT_LISTEN);
    }

    #[tokio::test]
    async fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "registry = not toml").unwrap();

        assert!(Config::load_from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_from_file(&missing).await.is_err());
    }
}
