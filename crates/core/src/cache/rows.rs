//! Cache table schema and row types.

use serde::{Deserialize, Serialize};

use crate::pedigree::PositionLabel;
use crate::race::RaceId;

/// Header row of the cache table. Column order is significant.
pub const HEADER: [&str; 6] = ["馬名", "該当箇所", "競馬場", "レース", "ウマ娘血統", "race_id"];

/// `matched_positions` text of a sentinel row.
pub const NO_MATCH_MARKER: &str = "該当なし";

/// Separator between labels in `matched_positions`.
pub const POSITION_DELIMITER: &str = "、";

pub(crate) fn header_cells() -> Vec<String> {
    HEADER.iter().map(|h| h.to_string()).collect()
}

/// Identifies one cached search outcome: a race and the ancestor searched for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub race_id: String,
    /// Display-form ancestor name, stored as given (not normalized).
    pub target_ancestor: String,
}

impl CacheKey {
    pub fn new(race_id: impl Into<String>, target_ancestor: impl Into<String>) -> Self {
        Self { race_id: race_id.into(), target_ancestor: target_ancestor.into() }
    }

    pub fn for_race(race: &RaceId, target_ancestor: impl Into<String>) -> Self {
        Self::new(race.to_string(), target_ancestor)
    }
}

/// One horse whose pedigree contains the target ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MatchRow {
    pub horse_name: String,
    /// Matched labels joined with `、`.
    pub matched_positions: String,
    pub venue: String,
    pub race_label: String,
}

impl MatchRow {
    pub fn new(horse_name: impl Into<String>, positions: &[PositionLabel], race: &RaceId) -> Self {
        Self {
            horse_name: horse_name.into(),
            matched_positions: join_positions(positions),
            venue: race.venue().name().to_string(),
            race_label: race.race_label(),
        }
    }
}

pub fn join_positions(positions: &[PositionLabel]) -> String {
    positions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(POSITION_DELIMITER)
}

/// A full row of the cache table, including the lookup columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRow {
    pub horse_name: String,
    pub matched_positions: String,
    pub venue: String,
    pub race_label: String,
    pub target_ancestor: String,
    pub race_id: String,
}

impl CacheRow {
    /// The "checked, nothing found" row for `key`.
    pub fn sentinel(key: &CacheKey) -> Self {
        Self {
            horse_name: String::new(),
            matched_positions: NO_MATCH_MARKER.to_string(),
            venue: String::new(),
            race_label: String::new(),
            target_ancestor: key.target_ancestor.clone(),
            race_id: key.race_id.clone(),
        }
    }

    pub fn from_match(key: &CacheKey, row: &MatchRow) -> Self {
        Self {
            horse_name: row.horse_name.clone(),
            matched_positions: row.matched_positions.clone(),
            venue: row.venue.clone(),
            race_label: row.race_label.clone(),
            target_ancestor: key.target_ancestor.clone(),
            race_id: key.race_id.clone(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.matched_positions == NO_MATCH_MARKER
    }

    pub fn belongs_to(&self, key: &CacheKey) -> bool {
        self.race_id == key.race_id && self.target_ancestor == key.target_ancestor
    }

    /// Drops the lookup-only columns.
    pub fn to_match_row(&self) -> MatchRow {
        MatchRow {
            horse_name: self.horse_name.clone(),
            matched_positions: self.matched_positions.clone(),
            venue: self.venue.clone(),
            race_label: self.race_label.clone(),
        }
    }

    /// Cells in header order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.horse_name.clone(),
            self.matched_positions.clone(),
            self.venue.clone(),
            self.race_label.clone(),
            self.target_ancestor.clone(),
            self.race_id.clone(),
        ]
    }

    /// Parse cells in header order.
    ///
    /// Missing trailing cells read as blank (spreadsheet stores drop them).
    /// Returns None for a row wider than the header.
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        if cells.len() > HEADER.len() {
            return None;
        }
        let cell = |i: usize| cells.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
        Some(Self {
            horse_name: cell(0),
            matched_positions: cell(1),
            venue: cell(2),
            race_label: cell(3),
            target_ancestor: cell(4),
            race_id: cell(5),
        })
    }
}
