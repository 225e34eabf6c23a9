//! cache_clear tool implementation.

use ketto_core::{ResultCache, TableStore};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_clear tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearParams {}

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Number of rows deleted (header excluded).
    pub deleted: usize,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl<S: TableStore>(
    cache: &ResultCache<S>, _params: CacheClearParams,
) -> Result<CallToolResult, McpError> {
    let deleted = cache.clear().await?;
    json_result(&CacheClearOutput { deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_json;
    use ketto_core::CacheKey;
    use ketto_core::cache::MemoryTable;

    #[tokio::test]
    async fn test_clear_reports_deleted_rows() {
        let cache = ResultCache::new(MemoryTable::new());
        cache.upsert(&CacheKey::new("202505020301", "a"), &[]).await.unwrap();
        cache.upsert(&CacheKey::new("202505020302", "a"), &[]).await.unwrap();

        let output = result_json(&clear_impl(&cache, CacheClearParams::default()).await.unwrap());
        assert_eq!(output["deleted"], 2);
        assert_eq!(cache.store().len(), 1);

        let output = result_json(&clear_impl(&cache, CacheClearParams::default()).await.unwrap());
        assert_eq!(output["deleted"], 0);
    }
}
