// Configuration - where the catalog lives and how long a fetch may take

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default address of the static catalog resource.
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3000/pokemon.json";

/// Default bind address of the server.
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// File name of the catalog document inside the server's data directory.
pub const CATALOG_FILE_NAME: &str = "pokemon.json";

/// Default fetch timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// FETCH CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    /// Upper bound on retrieving the document (HTTP request and body, or the
    /// file read). Decoding runs after it and is not counted.
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn with_timeout_secs(secs: u64) -> Self {
        FetchConfig {
            timeout: Duration::from_secs(secs),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::with_timeout_secs(DEFAULT_TIMEOUT_SECS)
    }
}

// ============================================================================
// CATALOG LOCATION
// ============================================================================

/// Where the catalog document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    /// GET an absolute URL
    Url(String),
    /// Read a local file
    File(PathBuf),
}

impl CatalogLocation {
    /// Resolve command-line options: an explicit file wins over a URL.
    pub fn from_options(url: Option<String>, file: Option<PathBuf>) -> Self {
        match (file, url) {
            (Some(path), _) => CatalogLocation::File(path),
            (None, Some(url)) => CatalogLocation::Url(url),
            (None, None) => CatalogLocation::Url(DEFAULT_CATALOG_URL.to_string()),
        }
    }
}

impl Default for CatalogLocation {
    fn default() -> Self {
        CatalogLocation::Url(DEFAULT_CATALOG_URL.to_string())
    }
}

impl fmt::Display for CatalogLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLocation::Url(url) => f.write_str(url),
            CatalogLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}
