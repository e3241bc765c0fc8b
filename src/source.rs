// Catalog Source - one GET-style retrieval of the catalog document
// Every call performs a fresh read; nothing is cached here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{CatalogLocation, FetchConfig};
use crate::error::{CatalogError, Result};
use crate::record::{decode_catalog, Record};

/// Retrieves and decodes the full catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Record>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Build the source for a configured location.
pub fn source_for(location: &CatalogLocation, config: FetchConfig) -> Result<Arc<dyn CatalogSource>> {
    let source: Arc<dyn CatalogSource> = match location {
        CatalogLocation::Url(url) => Arc::new(HttpSource::new(url.clone(), config)?),
        CatalogLocation::File(path) => Arc::new(FileSource::new(path.clone(), config)),
    };
    Ok(source)
}

// ============================================================================
// HTTP SOURCE
// ============================================================================

pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, config: FetchConfig) -> Result<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| CatalogError::Http {
                url: url.clone(),
                source,
            })?;

        Ok(HttpSource {
            client,
            url,
            timeout: config.timeout,
        })
    }

    fn transport_error(&self, source: reqwest::Error) -> CatalogError {
        if source.is_timeout() {
            CatalogError::Timeout(self.timeout)
        } else {
            CatalogError::Http {
                url: self.url.clone(),
                source,
            }
        }
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        debug!(url = %self.url, "fetching catalog");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(decode_catalog(&body)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// ============================================================================
// FILE SOURCE
// ============================================================================

pub struct FileSource {
    path: PathBuf,
    timeout: Duration,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, config: FetchConfig) -> Self {
        FileSource {
            path: path.into(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        debug!(path = %self.path.display(), "reading catalog");

        let bytes = tokio::time::timeout(self.timeout, tokio::fs::read(&self.path))
            .await
            .map_err(|_| CatalogError::Timeout(self.timeout))?
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(decode_catalog(&bytes)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
