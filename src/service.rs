// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search service - the tool operation boundary
//!
//! ```text
//! search(params, filters)
//!       │
//!       ├─→ QueryComposer → SearchRequest
//!       ├─→ SearchBackend::search (one round trip, no retry)
//!       └─→ normalize → JSON text
//!
//! Err anywhere → logged here → None / empty Vec
//! ```
//!
//! The `try_*` methods return the typed error; the plain methods are the
//! caller-facing contract where every failure collapses into the absence
//! value.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::client::messages::{IndicesRequest, StateRequest};
use crate::client::{ClientError, SearchBackend};
use crate::metrics::{self, LatencyTimer};
use crate::normalize::{self, IndexSummary};
use crate::search::{
    FilterSpecification, QueryComposer, SearchParams, TokenizationPolicy, WhitespaceHeuristic,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub const DEFAULT_TOP_HITS: i32 = 10;

/// Search operations over an injected backend
pub struct NrtsearchService<P = WhitespaceHeuristic> {
    backend: Arc<dyn SearchBackend>,
    composer: QueryComposer<P>,
    default_top_hits: i32,
}

impl NrtsearchService {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::with_composer(backend, QueryComposer::new())
    }
}

impl<P: TokenizationPolicy> NrtsearchService<P> {
    pub fn with_composer(backend: Arc<dyn SearchBackend>, composer: QueryComposer<P>) -> Self {
        Self {
            backend,
            composer,
            default_top_hits: DEFAULT_TOP_HITS,
        }
    }

    /// Hit count used when a caller omits `size`.
    pub fn with_default_top_hits(mut self, top_hits: i32) -> Self {
        self.default_top_hits = top_hits;
        self
    }

    pub fn default_top_hits(&self) -> i32 {
        self.default_top_hits
    }

    /// Search, returning the response as JSON text or `None` on any failure.
    pub async fn search(&self, params: &SearchParams, filters: &FilterSpecification) -> Option<String> {
        match self.try_search(params, filters).await {
            Ok(text) => Some(text),
            Err(e) => {
                error!(index = %params.index_name, error = %e, "Search failed");
                None
            }
        }
    }

    pub async fn try_search(
        &self,
        params: &SearchParams,
        filters: &FilterSpecification,
    ) -> Result<String, ServiceError> {
        let request = self.composer.compose(params, filters);

        let result = {
            let _timer = LatencyTimer::new("search");
            self.backend.search(&request).await
        };
        metrics::record_backend_call("search", result.is_ok());
        let response = result?;

        info!(
            index = %params.index_name,
            hits = response.hits.len(),
            "Search completed"
        );
        Ok(normalize::search_response_text(&response)?)
    }

    /// List indices, or an empty list on any failure.
    pub async fn list_indices(&self) -> Vec<IndexSummary> {
        match self.try_list_indices().await {
            Ok(indices) => indices,
            Err(e) => {
                error!(error = %e, "Listing indices failed");
                Vec::new()
            }
        }
    }

    pub async fn try_list_indices(&self) -> Result<Vec<IndexSummary>, ServiceError> {
        let result = {
            let _timer = LatencyTimer::new("indices");
            self.backend.indices(&IndicesRequest::default()).await
        };
        metrics::record_backend_call("indices", result.is_ok());
        Ok(normalize::index_summaries(result?))
    }

    /// Index state as JSON text, or `None` on any failure.
    pub async fn index_state(&self, index_name: &str) -> Option<String> {
        match self.try_index_state(index_name).await {
            Ok(text) => Some(text),
            Err(e) => {
                error!(index = %index_name, error = %e, "Fetching index state failed");
                None
            }
        }
    }

    pub async fn try_index_state(&self, index_name: &str) -> Result<String, ServiceError> {
        let request = StateRequest {
            index_name: index_name.to_string(),
        };
        let result = {
            let _timer = LatencyTimer::new("state");
            self.backend.state(&request).await
        };
        metrics::record_backend_call("state", result.is_ok());
        Ok(serde_json::to_string_pretty(&result?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::messages::{
        IndexStatsResponse, IndicesResponse, SearchRequest, SearchResponse, StateResponse,
        StatsResponse,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Canned backend that records the last search request
    #[derive(Default)]
    struct StubBackend {
        fail: bool,
        last_search: Mutex<Option<SearchRequest>>,
    }

    impl StubBackend {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn error() -> ClientError {
            ClientError::Status {
                status: 503,
                body: "unavailable".to_string(),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
            *self.last_search.lock().unwrap() = Some(request.clone());
            if self.fail {
                return Err(Self::error());
            }
            Ok(SearchResponse::default())
        }

        async fn indices(&self, _request: &IndicesRequest) -> Result<IndicesResponse, ClientError> {
            if self.fail {
                return Err(Self::error());
            }
            Ok(IndicesResponse {
                indices_response: vec![IndexStatsResponse {
                    index_name: "listings".to_string(),
                    stats_response: StatsResponse {
                        dir_size: 10,
                        num_docs: 2,
                        ..Default::default()
                    },
                }],
            })
        }

        async fn state(&self, request: &StateRequest) -> Result<StateResponse, ClientError> {
            if self.fail {
                return Err(Self::error());
            }
            let mut fields = serde_json::Map::new();
            fields.insert("indexName".to_string(), json!(request.index_name));
            Ok(StateResponse { fields })
        }
    }

    #[tokio::test]
    async fn test_search_success_returns_json_text() {
        let backend = Arc::new(StubBackend::default());
        let service = NrtsearchService::new(backend.clone());

        let text = service
            .search(
                &SearchParams::new("listings", 10),
                &FilterSpecification::new().exact("city", "Boston"),
            )
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["hits"], json!([]));

        let sent = backend.last_search.lock().unwrap().clone().unwrap();
        assert_eq!(sent.index_name, "listings");
    }

    #[tokio::test]
    async fn test_search_failure_returns_none() {
        let service = NrtsearchService::new(Arc::new(StubBackend::failing()));
        let result = service
            .search(&SearchParams::new("listings", 10), &FilterSpecification::new())
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_try_search_keeps_error() {
        let service = NrtsearchService::new(Arc::new(StubBackend::failing()));
        let err = service
            .try_search(&SearchParams::new("listings", 10), &FilterSpecification::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Client(ClientError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_list_indices() {
        let service = NrtsearchService::new(Arc::new(StubBackend::default()));
        let indices = service.list_indices().await;
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].dir_size, "10");
        assert_eq!(indices[0].num_docs, "2");
    }

    #[tokio::test]
    async fn test_list_indices_failure_is_empty() {
        let service = NrtsearchService::new(Arc::new(StubBackend::failing()));
        assert!(service.list_indices().await.is_empty());
    }

    #[test]
    fn test_default_top_hits() {
        let service = NrtsearchService::new(Arc::new(StubBackend::default()));
        assert_eq!(service.default_top_hits(), DEFAULT_TOP_HITS);
        assert_eq!(service.with_default_top_hits(25).default_top_hits(), 25);
    }

    #[tokio::test]
    async fn test_index_state() {
        let service = NrtsearchService::new(Arc::new(StubBackend::default()));
        let text = service.index_state("listings").await.unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["indexName"], "listings");

        let service = NrtsearchService::new(Arc::new(StubBackend::failing()));
        assert!(service.index_state("listings").await.is_none());
    }
}
