// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Request/response messages exchanged with the nrtsearch gateway.
//!
//! Field names follow the protobuf-JSON mapping. 64-bit integers arrive as
//! JSON strings (`"dirSize": "1024"`), so the numeric decoders accept both
//! strings and numbers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::search::Query;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub index_name: String,
    pub top_hits: i32,
    #[serde(default)]
    pub retrieve_fields: Vec<String>,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hits: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<Hit>,
    /// Anything else the backend returned (diagnostics, search state, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalHits {
    #[serde(default)]
    pub relation: String,
    #[serde(default, deserialize_with = "int64")]
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    #[serde(default)]
    pub lucene_doc_id: i32,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicesRequest {}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicesResponse {
    #[serde(default)]
    pub indices_response: Vec<IndexStatsResponse>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatsResponse {
    #[serde(default)]
    pub index_name: String,
    #[serde(default)]
    pub stats_response: StatsResponse,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default, deserialize_with = "int64")]
    pub dir_size: i64,
    #[serde(default, deserialize_with = "int64")]
    pub num_docs: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRequest {
    pub index_name: String,
}

/// Index state, passed through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Decode a protobuf-JSON int64 (string or number).
fn int64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_indices_response_accepts_string_int64() {
        let response: IndicesResponse = serde_json::from_value(json!({
            "indicesResponse": [
                {"indexName": "listings", "statsResponse": {"dirSize": "2048", "numDocs": 12, "ord": 3}},
                {"indexName": "empty"}
            ]
        }))
        .unwrap();

        assert_eq!(response.indices_response.len(), 2);
        let stats = &response.indices_response[0].stats_response;
        assert_eq!(stats.dir_size, 2048);
        assert_eq!(stats.num_docs, 12);
        assert_eq!(stats.extra.get("ord"), Some(&json!(3)));
        assert_eq!(response.indices_response[1].stats_response.dir_size, 0);
    }

    #[test]
    fn test_indices_response_tolerates_omitted_index_name() {
        let response: IndicesResponse = serde_json::from_value(serde_json::json!({
            "indicesResponse": [
                {"statsResponse": {"numDocs": "3"}},
                {"indexName": "listings", "statsResponse": {"numDocs": "5"}}
            ]
        }))
        .unwrap();

        assert_eq!(response.indices_response.len(), 2);
        assert_eq!(response.indices_response[0].index_name, "");
        assert_eq!(response.indices_response[0].stats_response.num_docs, 3);
        assert_eq!(response.indices_response[1].index_name, "listings");
    }

    #[test]
    fn test_int64_rejects_garbage() {
        let result: Result<StatsResponse, _> = serde_json::from_value(json!({"dirSize": "lots"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_search_response_keeps_unknown_fields() {
        let response: SearchResponse = serde_json::from_value(json!({
            "totalHits": {"relation": "EQUAL_TO", "value": "1"},
            "hits": [{"luceneDocId": 4, "score": 1.5, "fields": {"name": {"fieldValue": [{"textValue": "a"}]}}}],
            "diagnostics": {"firstPassSearchTimeMs": 0.4}
        }))
        .unwrap();

        assert_eq!(response.total_hits.as_ref().unwrap().value, 1);
        assert_eq!(response.hits[0].lucene_doc_id, 4);
        assert!(response.extra.contains_key("diagnostics"));
    }

    #[test]
    fn test_search_request_wire_form() {
        let request = SearchRequest {
            index_name: "listings".to_string(),
            top_hits: 10,
            retrieve_fields: vec!["*".to_string()],
            query: Query::BooleanQuery(Default::default()),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "indexName": "listings",
                "topHits": 10,
                "retrieveFields": ["*"],
                "query": {"booleanQuery": {"clauses": []}}
            })
        );
    }
}
