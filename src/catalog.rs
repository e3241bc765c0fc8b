// Catalog Store - fetches the record set once and holds it for the session
//
// State machine:
//   Unloaded -> Loading -> Loaded(catalog)
//                      \-> Failed(reason)
//
// A store never reads its source twice. Failed is terminal: absence of data is
// surfaced to the views, not retried.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::Result;
use crate::record::Record;
use crate::source::CatalogSource;

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered, immutable record set. Cloning shares the same records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Arc<[Arc<Record>]>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        Catalog {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Record>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for Catalog {
    fn from(records: Vec<Record>) -> Self {
        Catalog::new(records)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Arc<Record>;
    type IntoIter = std::slice::Iter<'a, Arc<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// LOAD STATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded(Catalog),
    /// Fetch or decode failed; holds the reason for display
    Failed(String),
}

impl LoadState {
    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loading => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Failed(_) => "failed",
        }
    }
}

// ============================================================================
// CATALOG STORE
// ============================================================================

#[derive(Debug)]
pub struct CatalogStore {
    state: LoadState,
}

impl CatalogStore {
    pub fn new() -> Self {
        CatalogStore {
            state: LoadState::Unloaded,
        }
    }

    /// Store that starts out loaded, for callers that already hold the records
    pub fn preloaded(records: Vec<Record>) -> Self {
        CatalogStore {
            state: LoadState::Loaded(Catalog::new(records)),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The catalog, or `None` while unloaded, loading or failed
    pub fn get(&self) -> Option<&Catalog> {
        match &self.state {
            LoadState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Claim the store's single fetch. Returns false if a load was already
    /// started, in which case the caller must not fetch.
    pub fn begin_load(&mut self) -> bool {
        if self.state != LoadState::Unloaded {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Record the outcome of the fetch claimed by [`begin_load`](Self::begin_load).
    /// Outcomes arriving in any other state are discarded.
    pub fn complete(&mut self, result: Result<Vec<Record>>) {
        if !self.is_loading() {
            warn!(state = self.state.label(), "discarding catalog result outside of a load");
            return;
        }

        self.state = match result {
            Ok(records) => {
                info!(count = records.len(), "catalog loaded");
                LoadState::Loaded(Catalog::new(records))
            }
            Err(e) => {
                warn!(error = %e, "catalog load failed");
                LoadState::Failed(e.to_string())
            }
        };
    }

    /// Fetch from `source` if this store has never fetched, and wait for the outcome.
    pub async fn load(&mut self, source: &dyn CatalogSource) -> &LoadState {
        if self.begin_load() {
            info!(source = %source.describe(), "loading catalog");
            let result = source.fetch().await;
            self.complete(result);
        }
        &self.state
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
