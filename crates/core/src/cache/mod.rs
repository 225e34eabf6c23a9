//! Result cache for pedigree searches.
//!
//! Outcomes are stored in a flat, spreadsheet-like table (header row plus one
//! row per matching horse, or a single sentinel row when nothing matched).
//!
//! - [`TableStore`] abstracts the table; [`SqliteTable`] persists it in SQLite
//!   via tokio-rusqlite and [`MemoryTable`] keeps it in process.
//! - [`ResultCache`] implements snapshot reads, point queries, replace-style
//!   upserts and bulk clear on top of any store.

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod results;
pub mod rows;
pub mod table;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryTable;
pub use results::{CacheLookup, ResultCache, Snapshot, StoredRow};
pub use rows::{CacheKey, CacheRow, HEADER, MatchRow, NO_MATCH_MARKER, POSITION_DELIMITER, join_positions};
pub use table::{SqliteTable, TableStore};
