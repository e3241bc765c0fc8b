// Selection Model - at most one record marked for detailed inspection

use std::sync::Arc;

use crate::record::Record;

/// Holds a shared handle to a catalog record, never a copy of it.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    current: Option<Arc<Record>>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any prior selection
    pub fn select(&mut self, record: Arc<Record>) {
        self.current = Some(record);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Arc<Record>> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.current.as_ref().is_some_and(|r| r.id == id)
    }
}
