//! In-process table store.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::table::TableStore;
use crate::Error;

/// A table held in memory. Useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<String>>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TableStore for MemoryTable {
    async fn read_all(&self) -> Result<Vec<Vec<String>>, Error> {
        Ok(self.lock().clone())
    }

    async fn append(&self, rows: Vec<Vec<String>>) -> Result<(), Error> {
        self.lock().extend(rows);
        Ok(())
    }

    async fn delete(&self, row_index: usize) -> Result<(), Error> {
        let mut rows = self.lock();
        if row_index == 0 || row_index > rows.len() {
            return Err(Error::RowOutOfRange { index: row_index, len: rows.len() });
        }
        rows.remove(row_index - 1);
        Ok(())
    }
}
