// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # nrtsearch MCP
//!
//! Agent tools over an nrtsearch server: loosely shaped filter maps in,
//! typed boolean queries out, normalized JSON back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Tool Layer                           │
//! │  • MCP stdio server (JSON-RPC 2.0)                          │
//! │  • search / list_indices / get_index_state                  │
//! │  • Loose JSON arguments → typed FilterSpecification         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     NrtsearchService                        │
//! │  • QueryComposer → one SearchRequest per call               │
//! │  • Failures logged and folded into null / empty results     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    (one round trip, no retry)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 SearchBackend (NrtsearchClient)             │
//! │  • nrtsearch JSON gateway: /v1/search, /v1/indices, ...     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nrtsearch_mcp::{NrtsearchClient, NrtsearchConfig, NrtsearchService};
//! use nrtsearch_mcp::search::{FilterSpecification, RangeBounds, SearchParams};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = NrtsearchConfig::default();
//!     let client = NrtsearchClient::new(&config).expect("valid endpoint");
//!     let service = NrtsearchService::new(Arc::new(client));
//!
//!     let filters = FilterSpecification::new()
//!         .exact("city", "Boston")
//!         .range("price", RangeBounds::new().lte(100.0));
//!
//!     match service.search(&SearchParams::new("listings", 10), &filters).await {
//!         Some(json) => println!("{}", json),
//!         None => eprintln!("search failed"),
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod mcp;
pub mod metrics;
pub mod normalize;
pub mod search;
pub mod service;
pub mod tools;

pub use client::{ClientError, NrtsearchClient, SearchBackend};
pub use config::{ConfigError, NrtsearchConfig};
pub use mcp::McpServer;
pub use metrics::LatencyTimer;
pub use normalize::IndexSummary;
pub use service::{NrtsearchService, ServiceError};
pub use tools::{call_tool, tool_definitions, ToolDefinition, ToolError};
