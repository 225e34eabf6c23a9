//! Cache-related MCP tools.
//!
//! This module provides tools for inspecting and resetting the result cache.

pub mod clear;
pub mod query;

pub use clear::{CacheClearParams, clear_impl};
pub use query::{CacheQueryParams, query_impl};
