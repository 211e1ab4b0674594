// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Agent-facing tools.
//!
//! Each tool has a name, a description the agent reads, and a JSON Schema
//! for its arguments. Arguments arrive as loose JSON and are converted into
//! typed parameters here; everything downstream works on typed values.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics;
use crate::search::{FilterSpecification, SearchParams, TokenizationPolicy};
use crate::service::NrtsearchService;

pub const SEARCH: &str = "search";
pub const LIST_INDICES: &str = "list_indices";
pub const GET_INDEX_STATE: &str = "get_index_state";

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),
    #[error("Invalid arguments for '{tool}': {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode result of '{tool}': {source}")]
    Encode {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Tool definition as listed by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            SEARCH,
            "Search for documents in a specific index. Supports filtering by exact matches, \
             text matches, one-of matches, range queries and geo-radius queries. Returns a JSON \
             representation of the search response with hits and the total hits count, or null \
             if an error occurs. Exact match takes a map of field names to exact values. Text \
             match does a partial phrase match on a field. One-of match takes a map of field \
             names to lists of values. Range takes a map of field names to maps with 'gt'/'gte' \
             and/or 'lt'/'lte' values. Geo-radius takes a map of field names to maps with 'lat', \
             'lon' and 'radius'; radius is in meters. Retrieve fields is a list of field names \
             to return; omit it (or pass null) to retrieve all fields.",
            json!({
                "type": "object",
                "properties": {
                    "indexName": {
                        "type": "string",
                        "description": "Index to search"
                    },
                    "size": {
                        "type": "integer",
                        "minimum": 0,
                        "default": 10,
                        "description": "Maximum number of hits to return"
                    },
                    "retrieveFields": {
                        "type": ["array", "null"],
                        "items": {"type": "string"},
                        "description": "Fields to return; null retrieves all fields"
                    },
                    "matchExact": {
                        "type": ["object", "null"],
                        "additionalProperties": {"type": ["string", "number", "boolean"]},
                        "description": "Field name to exact value"
                    },
                    "matchText": {
                        "type": ["object", "null"],
                        "additionalProperties": {"type": "string"},
                        "description": "Field name to text for a phrase match"
                    },
                    "matchOneOf": {
                        "type": ["object", "null"],
                        "additionalProperties": {
                            "type": "array",
                            "items": {"type": ["string", "number", "boolean"]}
                        },
                        "description": "Field name to list of accepted values"
                    },
                    "matchRange": {
                        "type": ["object", "null"],
                        "additionalProperties": {
                            "type": "object",
                            "properties": {
                                "gt": {"type": "number"},
                                "gte": {"type": "number"},
                                "lt": {"type": "number"},
                                "lte": {"type": "number"}
                            }
                        },
                        "description": "Field name to bounds"
                    },
                    "matchGeoRadius": {
                        "type": ["object", "null"],
                        "additionalProperties": {
                            "type": "object",
                            "properties": {
                                "lat": {"type": "number"},
                                "lon": {"type": "number"},
                                "radius": {"type": "number", "description": "Meters"}
                            },
                            "required": ["lat", "lon", "radius"]
                        },
                        "description": "Field name to center and radius"
                    }
                },
                "required": ["indexName"]
            }),
        ),
        ToolDefinition::new(
            LIST_INDICES,
            "List indices in the nrtsearch server. Returns a list of records with the index \
             name (indexName), directory size in bytes (dirSize) and number of documents \
             (numDocs). Returns an empty list if an error occurs.",
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        ToolDefinition::new(
            GET_INDEX_STATE,
            "Get the state of an index: settings, live settings and registered fields. \
             Returns the state as JSON, or null if an error occurs.",
            json!({
                "type": "object",
                "properties": {
                    "indexName": {
                        "type": "string",
                        "description": "Index to inspect"
                    }
                },
                "required": ["indexName"]
            }),
        ),
    ]
}

/// Arguments of the `search` tool
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub index_name: String,
    #[serde(default)]
    pub size: Option<i32>,
    #[serde(default)]
    pub retrieve_fields: Option<Vec<String>>,
    #[serde(flatten)]
    pub filters: FilterSpecification,
}

impl SearchArgs {
    pub fn params(&self, default_size: i32) -> SearchParams {
        SearchParams {
            index_name: self.index_name.clone(),
            size: self.size.unwrap_or(default_size),
            retrieve_fields: self.retrieve_fields.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStateArgs {
    pub index_name: String,
}

fn parse_args<T: for<'de> Deserialize<'de>>(tool: &str, args: Value) -> Result<T, ToolError> {
    // Tools without required arguments may be called with no arguments at all
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

fn encode<T: Serialize>(tool: &str, value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|source| ToolError::Encode {
        tool: tool.to_string(),
        source,
    })
}

/// Dispatch one tool call.
///
/// `search` and `get_index_state` yield a JSON string or `null`;
/// `list_indices` yields an array. Backend failures are already folded into
/// those values by the service, so `Err` only means the call itself was bad.
pub async fn call_tool<P: TokenizationPolicy>(
    service: &NrtsearchService<P>,
    name: &str,
    args: Value,
) -> Result<Value, ToolError> {
    let result = dispatch(service, name, args).await;
    let status = match &result {
        Ok(Value::Null) => "empty",
        Ok(_) => "success",
        Err(_) => "error",
    };
    metrics::record_tool_call(name, status);
    if let Err(e) = &result {
        warn!(tool = %name, error = %e, "Tool call rejected");
    }
    result
}

async fn dispatch<P: TokenizationPolicy>(
    service: &NrtsearchService<P>,
    name: &str,
    args: Value,
) -> Result<Value, ToolError> {
    match name {
        SEARCH => {
            let args: SearchArgs = parse_args(name, args)?;
            let params = args.params(service.default_top_hits());
            debug!(index = %params.index_name, filters = args.filters.len(), "search tool");
            Ok(service
                .search(&params, &args.filters)
                .await
                .map(Value::String)
                .unwrap_or(Value::Null))
        }
        LIST_INDICES => encode(name, service.list_indices().await),
        GET_INDEX_STATE => {
            let args: IndexStateArgs = parse_args(name, args)?;
            Ok(service
                .index_state(&args.index_name)
                .await
                .map(Value::String)
                .unwrap_or(Value::Null))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Render a tool result as the text handed back to the agent.
pub fn result_text(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(text) => Ok(text.clone()),
        other => serde_json::to_string_pretty(other),
    }
}
