// Shared Context - the state every client view reads from
//
// Owns the catalog store, the filter string and the selection. Views receive
// it explicitly, so filter and selection survive navigation between views.
// Filtered lists are derived on every read and never stored.

use std::sync::Arc;

use crate::catalog::{CatalogStore, LoadState};
use crate::error::Result;
use crate::filter;
use crate::lookup::{find_by_id, ClientLookup};
use crate::record::Record;
use crate::selection::SelectionModel;

#[derive(Debug, Default)]
pub struct SharedContext {
    store: CatalogStore,
    filter: String,
    selection: SelectionModel,
}

impl SharedContext {
    pub fn new(store: CatalogStore) -> Self {
        SharedContext {
            store,
            filter: String::new(),
            selection: SelectionModel::new(),
        }
    }

    // ========================================================================
    // CATALOG
    // ========================================================================

    pub fn load_state(&self) -> &LoadState {
        self.store.state()
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CatalogStore {
        &mut self.store
    }

    /// Claim the single catalog fetch for this session
    pub fn begin_load(&mut self) -> bool {
        self.store.begin_load()
    }

    pub fn complete_load(&mut self, result: Result<Vec<Record>>) {
        self.store.complete(result);
    }

    // ========================================================================
    // FILTER
    // ========================================================================

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    /// Records passing the current filter, capped for display.
    /// Empty until the catalog has loaded.
    pub fn visible(&self) -> Vec<&Arc<Record>> {
        match self.store.get() {
            Some(catalog) => filter::apply(catalog, &self.filter),
            None => Vec::new(),
        }
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn select(&mut self, record: Arc<Record>) {
        self.selection.select(record);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> Option<&Arc<Record>> {
        self.selection.current()
    }

    // ========================================================================
    // LOOKUP (client path)
    // ========================================================================

    /// Resolve `id` against the session's catalog.
    pub fn find_by_id(&self, id: i64) -> ClientLookup<Arc<Record>> {
        match self.store.state() {
            LoadState::Unloaded | LoadState::Loading => ClientLookup::Loading,
            LoadState::Failed(_) => ClientLookup::Unavailable,
            LoadState::Loaded(catalog) => match find_by_id(catalog, id) {
                Some(record) => ClientLookup::Found(Arc::clone(record)),
                None => ClientLookup::NotFound,
            },
        }
    }
}
