//! Result cache over a flat table store.
//!
//! Each (race, target ancestor) key is in one of three states: never checked
//! (no rows), checked with nothing found (one sentinel row), or checked with
//! matches (one row per matching horse). Writes replace every row of a key:
//! delete all existing rows for it, then append the new set.

use tokio::sync::Mutex;

use super::rows::{CacheKey, CacheRow, HEADER, MatchRow, header_cells};
use super::table::TableStore;
use crate::Error;

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Key was never written.
    Miss,
    /// Key was checked and nothing matched.
    Empty,
    /// Key was checked and these horses matched.
    Populated(Vec<MatchRow>),
}

impl CacheLookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLookup::Miss => "MISS",
            CacheLookup::Empty => "EMPTY",
            CacheLookup::Populated(_) => "POPULATED",
        }
    }

    pub fn is_hit(&self) -> bool {
        !matches!(self, CacheLookup::Miss)
    }

    /// Rows of a hit; empty for `Miss` and `Empty`.
    pub fn into_rows(self) -> Vec<MatchRow> {
        match self {
            CacheLookup::Populated(rows) => rows,
            CacheLookup::Miss | CacheLookup::Empty => Vec::new(),
        }
    }
}

/// A parsed cache row together with its physical 1-based row index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub row_index: usize,
    pub row: CacheRow,
}

/// Every row of the cache table at one point in time.
///
/// Load once per session with [`ResultCache::load_snapshot`] and answer many
/// lookups from it. A snapshot does not see writes made after it was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    has_header: bool,
    rows: Vec<StoredRow>,
}

impl Snapshot {
    /// Parse raw table rows. Row 1 must be the cache header.
    ///
    /// Rows that do not fit the schema are skipped; a header that disagrees
    /// with [`HEADER`] is an error.
    pub fn from_table(table: Vec<Vec<String>>) -> Result<Self, Error> {
        let mut rows = table.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Self::default());
        };
        check_header(&header)?;

        let rows = rows
            .enumerate()
            .filter_map(|(i, cells)| {
                let row_index = i + 2;
                match CacheRow::from_cells(&cells) {
                    Some(row) => Some(StoredRow { row_index, row }),
                    None => {
                        tracing::warn!(row_index, cells = cells.len(), "skipping malformed cache row");
                        None
                    }
                }
            })
            .collect();

        Ok(Self { has_header: true, rows })
    }

    pub fn has_header(&self) -> bool {
        self.has_header
    }

    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows stored under `key`, in table order.
    pub fn rows_for<'a>(&'a self, key: &'a CacheKey) -> impl Iterator<Item = &'a StoredRow> + 'a {
        self.rows.iter().filter(move |stored| stored.row.belongs_to(key))
    }

    /// Point query against this snapshot.
    pub fn lookup(&self, key: &CacheKey) -> CacheLookup {
        let mut seen = false;
        let mut matches = Vec::new();
        for stored in self.rows_for(key) {
            seen = true;
            if !stored.row.is_sentinel() {
                matches.push(stored.row.to_match_row());
            }
        }

        match (seen, matches.is_empty()) {
            (false, _) => CacheLookup::Miss,
            (true, true) => CacheLookup::Empty,
            (true, false) => CacheLookup::Populated(matches),
        }
    }
}

fn check_header(header: &[String]) -> Result<(), Error> {
    let mut found: Vec<&str> = header.iter().map(|c| c.trim()).collect();
    while found.last().is_some_and(|c| c.is_empty()) {
        found.pop();
    }
    if found == HEADER {
        Ok(())
    } else {
        Err(Error::SchemaMismatch { expected: header_cells(), found: header.to_vec() })
    }
}

/// Cache of search outcomes keyed by (race, target ancestor).
///
/// Writes go through a single writer gate: row deletes are positional, so any
/// concurrent write to the table (same key or not) could shift indices between
/// the read and the delete.
pub struct ResultCache<S> {
    store: S,
    write_gate: Mutex<()>,
}

impl<S: TableStore> ResultCache<S> {
    pub fn new(store: S) -> Self {
        Self { store, write_gate: Mutex::new(()) }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read every row once.
    pub async fn load_snapshot(&self) -> Result<Snapshot, Error> {
        let table = self.store.read_all().await?;
        Snapshot::from_table(table)
    }

    /// Look up `key`, reading the store unless a snapshot is supplied.
    pub async fn query(&self, key: &CacheKey, snapshot: Option<&Snapshot>) -> Result<CacheLookup, Error> {
        let lookup = match snapshot {
            Some(snapshot) => snapshot.lookup(key),
            None => self.load_snapshot().await?.lookup(key),
        };
        tracing::debug!(race_id = %key.race_id, target = %key.target_ancestor, status = lookup.as_str(), "cache query");
        Ok(lookup)
    }

    /// Replace every row stored under `key`.
    ///
    /// An empty `rows` writes a single sentinel row. The header is created if
    /// the table is empty.
    pub async fn upsert(&self, key: &CacheKey, rows: &[MatchRow]) -> Result<(), Error> {
        let _writer = self.write_gate.lock().await;

        let snapshot = self.load_snapshot().await?;

        let mut stale: Vec<usize> = snapshot.rows_for(key).map(|stored| stored.row_index).collect();
        stale.sort_unstable_by(|a, b| b.cmp(a));
        for row_index in &stale {
            self.store.delete(*row_index).await?;
        }

        let mut new_rows = Vec::with_capacity(rows.len() + 1);
        if !snapshot.has_header() {
            new_rows.push(header_cells());
        }
        if rows.is_empty() {
            new_rows.push(CacheRow::sentinel(key).to_cells());
        } else {
            new_rows.extend(rows.iter().map(|row| CacheRow::from_match(key, row).to_cells()));
        }
        self.store.append(new_rows).await?;

        tracing::info!(
            race_id = %key.race_id,
            target = %key.target_ancestor,
            replaced = stale.len(),
            written = rows.len(),
            "cache upsert"
        );
        Ok(())
    }

    /// Delete every row except the header, resetting all keys to unknown.
    ///
    /// Returns the number of rows removed.
    pub async fn clear(&self) -> Result<usize, Error> {
        let _writer = self.write_gate.lock().await;

        let len = self.store.read_all().await?.len();
        if len <= 1 {
            tracing::info!("cache already empty");
            return Ok(0);
        }

        self.store.delete_range(2, len).await?;
        tracing::info!(deleted = len - 1, "cache cleared");
        Ok(len - 1)
    }
}
