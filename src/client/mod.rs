// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search backend transport.
//!
//! [`SearchBackend`] is the seam between the tools and the nrtsearch server.
//! [`NrtsearchClient`] is the production implementation; tests plug in
//! in-memory backends.

pub mod http;
pub mod messages;

use async_trait::async_trait;
use thiserror::Error;

use messages::{
    IndicesRequest, IndicesResponse, SearchRequest, SearchResponse, StateRequest, StateResponse,
};

pub use http::NrtsearchClient;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid backend endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One round trip per call; failures are returned, never retried.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError>;
    async fn indices(&self, request: &IndicesRequest) -> Result<IndicesResponse, ClientError>;
    async fn state(&self, request: &StateRequest) -> Result<StateResponse, ClientError>;
}
