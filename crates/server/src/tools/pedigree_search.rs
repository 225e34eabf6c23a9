//! pedigree_search and pedigree_search_day tool implementations.
//!
//! Searches race entrants' pedigrees for a target ancestor, answering from
//! the result cache when possible.

use ketto_core::search::OutcomeSource;
use ketto_core::{
    MatchRow, PedigreeSearch, PedigreeSource, RaceDay, RaceId, RaceOutcome, SearchEvent, SearchOptions, TableStore,
    Venue,
};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{default_true, json_result};
use crate::error::ToolError;

/// Parameters for the pedigree_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRaceParams {
    /// Twelve-digit race id: year, venue code, meeting, day, race number.
    pub race_id: String,

    /// Ancestor name to look for, in display form.
    pub target: String,

    /// Answer from the cache when the race was already checked (default: true).
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

/// Parameters for the pedigree_search_day tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchDayParams {
    pub year: u16,

    /// Racecourse name (e.g. "東京") or two-digit code (e.g. "05").
    pub venue: String,

    /// Meeting number (開催回).
    pub meet: u8,

    /// Day within the meeting (日目).
    pub day: u8,

    /// Ancestor name to look for, in display form.
    pub target: String,

    /// Answer from the cache when a race was already checked (default: true).
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

/// Result for one race.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RaceSearchOutput {
    pub race_id: String,
    pub venue: String,
    pub race_label: String,
    /// "cache" or "fresh".
    pub source: String,
    /// Whether the result is stored in the cache.
    pub cached: bool,
    pub matches: Vec<MatchRow>,
    /// Horses whose pedigree could not be fetched.
    pub failed_horses: Vec<String>,
}

impl From<RaceOutcome> for RaceSearchOutput {
    fn from(outcome: RaceOutcome) -> Self {
        Self {
            race_id: outcome.race.to_string(),
            venue: outcome.race.venue().name().to_string(),
            race_label: outcome.race.race_label(),
            source: match outcome.source {
                OutcomeSource::Cache => "cache".into(),
                OutcomeSource::Fresh => "fresh".into(),
            },
            cached: outcome.cached,
            matches: outcome.rows,
            failed_horses: outcome.failed_horses,
        }
    }
}

/// Output from the pedigree_search_day tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchDayOutput {
    pub target: String,
    pub total_matches: usize,
    pub races: Vec<RaceSearchOutput>,
}

fn log_event(event: SearchEvent) {
    match event {
        SearchEvent::HorseChecked { race, horse, index, total, positions } => {
            tracing::debug!(race_id = %race, %horse, index, total, matched = positions.len(), "horse checked");
        }
        SearchEvent::HorseFailed { race, horse, error } => {
            tracing::warn!(race_id = %race, %horse, %error, "horse skipped");
        }
        SearchEvent::CacheHit { race, matches } => {
            tracing::debug!(race_id = %race, matches, "cache hit");
        }
        SearchEvent::RaceFinished { race, matches } => {
            tracing::info!(race_id = %race, matches, "race finished");
        }
        SearchEvent::RaceStarted { .. } => {}
    }
}

fn require_target(target: &str) -> Result<(), ToolError> {
    if target.trim().is_empty() {
        return Err(ToolError::InvalidInput("target cannot be empty".into()));
    }
    Ok(())
}

/// Implementation of the pedigree_search tool.
pub async fn search_race_impl<S: TableStore, P: PedigreeSource>(
    search: &PedigreeSearch<S, P>, params: SearchRaceParams,
) -> Result<CallToolResult, McpError> {
    require_target(&params.target)?;
    let race: RaceId = params.race_id.parse()?;

    let options = SearchOptions { use_cache: params.use_cache, snapshot: None };
    let outcome = search.search_race(&race, &params.target, options, &mut log_event).await?;

    json_result(&RaceSearchOutput::from(outcome))
}

/// Implementation of the pedigree_search_day tool.
pub async fn search_day_impl<S: TableStore, P: PedigreeSource>(
    search: &PedigreeSearch<S, P>, params: SearchDayParams,
) -> Result<CallToolResult, McpError> {
    require_target(&params.target)?;
    let venue: Venue = params
        .venue
        .parse()
        .map_err(|_| ToolError::InvalidInput(format!("unknown venue: {}", params.venue)))?;
    let day = RaceDay::new(params.year, venue, params.meet, params.day)?;

    let outcomes = search
        .search_day(&day, &params.target, params.use_cache, &mut log_event)
        .await?;

    let races: Vec<RaceSearchOutput> = outcomes.into_iter().map(RaceSearchOutput::from).collect();
    let output = SearchDayOutput {
        target: params.target,
        total_matches: races.iter().map(|r| r.matches.len()).sum(),
        races,
    };
    json_result(&output)
}
