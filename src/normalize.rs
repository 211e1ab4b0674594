// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Result shaping for tool callers.

use serde::{Deserialize, Serialize};

use crate::client::messages::{IndicesResponse, SearchResponse};

/// Flat index record returned by `list_indices`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSummary {
    pub index_name: String,
    /// Directory size in bytes, decimal
    pub dir_size: String,
    /// Document count, decimal
    pub num_docs: String,
}

/// Pretty JSON text of a search response (hits, total hits and whatever
/// else the backend sent).
pub fn search_response_text(response: &SearchResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}

pub fn index_summaries(response: IndicesResponse) -> Vec<IndexSummary> {
    response
        .indices_response
        .into_iter()
        .map(|index| IndexSummary {
            index_name: index.index_name,
            dir_size: index.stats_response.dir_size.to_string(),
            num_docs: index.stats_response.num_docs.to_string(),
        })
        .collect()
}
