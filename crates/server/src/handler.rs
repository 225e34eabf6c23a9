//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    CacheClearParams, CacheQueryParams, PositionLabelsParams, SearchDayParams, SearchRaceParams, clear_impl,
    labels_impl, query_impl, search_day_impl, search_race_impl,
};

use ketto_client::NetkeibaSource;
use ketto_core::PedigreeSearch;
use ketto_core::cache::SqliteTable;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// Search wired to the SQLite cache and the netkeiba scraper.
pub type Search = PedigreeSearch<SqliteTable, NetkeibaSource>;

/// The main MCP server handler for ketto.
#[derive(Clone)]
pub struct KettoServer {
    tool_router: ToolRouter<Self>,
    search: Arc<Search>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl KettoServer {
    /// Create a new server handler.
    pub fn new(search: Search) -> Self {
        Self { tool_router: Self::tool_router(), search: Arc::new(search) }
    }

    /// Search one race's entrants for an ancestor.
    ///
    /// Answers from the cache when the (race, ancestor) pair was checked before.
    #[tool(
        description = "Find horses in a race whose five-generation pedigree contains the given ancestor. Returns matching horses with their pedigree positions (父 = sire line, 母 = dam line)."
    )]
    async fn pedigree_search(&self, params: Parameters<SearchRaceParams>) -> Result<CallToolResult, McpError> {
        search_race_impl(&*self.search, params.0).await
    }

    /// Search all twelve races of a racing day.
    #[tool(
        description = "Search every race (1R to 12R) of a racing day for horses descended from the given ancestor."
    )]
    async fn pedigree_search_day(&self, params: Parameters<SearchDayParams>) -> Result<CallToolResult, McpError> {
        search_day_impl(&*self.search, params.0).await
    }

    #[tool(
        description = "Look up a cached result without scraping. Status is MISS (never checked), EMPTY (checked, no matches) or POPULATED."
    )]
    async fn cache_query(&self, params: Parameters<CacheQueryParams>) -> Result<CallToolResult, McpError> {
        query_impl(self.search.cache(), params.0).await
    }

    #[tool(description = "Delete every cached result. Returns the number of rows removed.")]
    async fn cache_clear(&self, params: Parameters<CacheClearParams>) -> Result<CallToolResult, McpError> {
        clear_impl(self.search.cache(), params.0).await
    }

    #[tool(description = "List pedigree position labels in slot order (父, 父父, ... 母母母母母).")]
    async fn position_labels(&self, params: Parameters<PositionLabelsParams>) -> Result<CallToolResult, McpError> {
        labels_impl(params.0)
    }
}

impl ServerHandler for KettoServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "ketto".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
