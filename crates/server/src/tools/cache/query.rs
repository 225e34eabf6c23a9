//! cache_query tool implementation.
//!
//! Reports whether a (race, ancestor) pair has been checked, without scraping.

use ketto_core::search::cached_outcome;
use ketto_core::{MatchRow, RaceId, ResultCache, TableStore};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_query tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheQueryParams {
    /// Twelve-digit race id.
    pub race_id: String,

    /// Ancestor name exactly as it was searched.
    pub target: String,
}

/// Output from the cache_query tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheQueryOutput {
    /// "MISS" (never checked), "EMPTY" (checked, no matches) or "POPULATED".
    pub status: String,
    pub matches: Vec<MatchRow>,
}

/// Implementation of the cache_query tool.
pub async fn query_impl<S: TableStore>(
    cache: &ResultCache<S>, params: CacheQueryParams,
) -> Result<CallToolResult, McpError> {
    let race: RaceId = params.race_id.parse()?;
    let lookup = cached_outcome(cache, &race, &params.target).await?;

    let status = lookup.as_str().to_string();
    json_result(&CacheQueryOutput { status, matches: lookup.into_rows() })
}
