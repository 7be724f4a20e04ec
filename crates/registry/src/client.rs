//! HTTP client for registry metadata documents

use pkgtree_errors::{Error, NetworkError};
use pkgtree_types::MetaDocument;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Registry client configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://registry.npmjs.org/".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("pkgtree/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Result of one metadata fetch
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// HTTP 304: the caller's cached document is still current
    NotModified,
    /// HTTP 2xx: a fresh document, with the response `ETag` if any
    Modified {
        doc: MetaDocument,
        etag: Option<String>,
    },
}

/// HTTP client for one registry base URL
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base: Url,
}

impl RegistryClient {
    /// Create a new registry client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the underlying HTTP
    /// client cannot be initialized.
    pub fn new(config: &RegistryConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        Ok(Self { client, base })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default
    /// settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&RegistryConfig::default())
    }

    /// Fetch the metadata document for `name`, optionally revalidating an
    /// existing cache entry with its `ETag`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Transport` on connection-level failure and
    /// `NetworkError::RegistryStatus` for any response status other than
    /// 2xx or 304.
    pub async fn fetch_meta(
        &self,
        name: &str,
        etag: Option<&str>,
    ) -> Result<FetchOutcome, Error> {
        let url = self
            .base
            .join(name)
            .map_err(|e| NetworkError::InvalidUrl(format!("{name}: {e}")))?;

        tracing::debug!(url = %url, conditional = etag.is_some(), "fetching registry metadata");

        let mut request = self.client.get(url);
        if let Some(etag) = etag {
            request = request.header(header::IF_NONE_MATCH, etag);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_MODIFIED => Ok(FetchOutcome::NotModified),
            status if status.is_success() => {
                let etag = response
                    .headers()
                    .get(header::ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);

                let doc = response
                    .json::<MetaDocument>()
                    .await
                    .map_err(|e| NetworkError::Transport(e.to_string()))?;

                Ok(FetchOutcome::Modified { doc, etag })
            }
            status => Err(NetworkError::RegistryStatus {
                status: status.as_u16(),
                name: name.to_string(),
            }
            .into()),
        }
    }
}
