// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! nrtsearch JSON gateway client.
//!
//! ```text
//! search   POST /v1/search
//! indices  GET  /v1/indices
//! state    GET  /v1/state/{indexName}
//! ```
//!
//! One client is built at startup and shared; reqwest pools the underlying
//! connections.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::messages::{
    IndicesRequest, IndicesResponse, SearchRequest, SearchResponse, StateRequest, StateResponse,
};
use super::{ClientError, SearchBackend};
use crate::config::NrtsearchConfig;

#[derive(Debug, Clone)]
pub struct NrtsearchClient {
    client: Client,
    base_url: Url,
}

impl NrtsearchClient {
    /// Build a client for the configured host and port.
    pub fn new(config: &NrtsearchConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.base_url(), config.request_timeout())
    }

    /// Build a client for an explicit gateway URL (e.g. `http://search:6000`).
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidEndpoint(base_url.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SearchBackend for NrtsearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        let url = self.endpoint(&["v1", "search"])?;
        debug!(index = %request.index_name, top_hits = request.top_hits, "POST {}", url);
        let response = self.client.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn indices(&self, _request: &IndicesRequest) -> Result<IndicesResponse, ClientError> {
        let url = self.endpoint(&["v1", "indices"])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    async fn state(&self, request: &StateRequest) -> Result<StateResponse, ClientError> {
        let url = self.endpoint(&["v1", "state", &request.index_name])?;
        debug!(index = %request.index_name, "GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}
