//! Core types and shared functionality for ketto.
//!
//! This crate provides:
//! - Pedigree position labels and ancestor-name matching
//! - Race identifiers
//! - The result cache over a flat table store (SQLite or in-memory)
//! - Race-by-race search orchestration
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod pedigree;
pub mod race;
pub mod search;

pub use cache::{CacheDb, CacheKey, CacheLookup, MatchRow, ResultCache, Snapshot, TableStore};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use pedigree::{PedigreeEntry, PedigreeMatcher, PositionIndex, PositionLabel};
pub use race::{RaceDay, RaceId, Venue};
pub use search::{Entrant, PedigreeSearch, PedigreeSource, RaceOutcome, SearchEvent, SearchOptions};
