// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query AST - the nrtsearch boolean query wire form
//!
//! Mirrors the subset of the nrtsearch `Query` message the filter tools emit,
//! using protobuf-JSON field names so the tree serializes straight onto the
//! backend's JSON gateway.
//!
//! # Example
//!
//! ```rust
//! use nrtsearch_mcp::search::{BooleanClause, BooleanQuery, Query, TermQuery};
//!
//! let clause = BooleanClause::filter(Query::TermQuery(TermQuery {
//!     field: "city".into(),
//!     text_value: "Boston".into(),
//! }));
//!
//! let query = Query::BooleanQuery(BooleanQuery { clauses: vec![clause] });
//! let json = serde_json::to_value(&query).unwrap();
//! assert_eq!(json["booleanQuery"]["clauses"][0]["occur"], "FILTER");
//! ```

use serde::{Deserialize, Serialize};

/// Search query AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Query {
    /// Exact term equality: `termQuery`
    TermQuery(TermQuery),
    /// Analyzed text match: `matchQuery`
    MatchQuery(MatchQuery),
    /// Term set membership: `termInSetQuery`
    TermInSetQuery(TermInSetQuery),
    /// Numeric range: `rangeQuery`
    RangeQuery(RangeQuery),
    /// Distance from a point: `geoRadiusQuery`
    GeoRadiusQuery(GeoRadiusQuery),
    /// Boolean combination: `booleanQuery`
    BooleanQuery(BooleanQuery),
}

impl Query {
    /// The clause kind this query represents.
    pub fn kind(&self) -> ClauseKind {
        match self {
            Query::TermQuery(_) => ClauseKind::Term,
            Query::MatchQuery(_) => ClauseKind::Text,
            Query::TermInSetQuery(_) => ClauseKind::TermSet,
            Query::RangeQuery(_) => ClauseKind::Range,
            Query::GeoRadiusQuery(_) => ClauseKind::GeoRadius,
            Query::BooleanQuery(_) => ClauseKind::Boolean,
        }
    }

    /// The field a leaf query is bound to (`None` for boolean nodes).
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::TermQuery(q) => Some(&q.field),
            Query::MatchQuery(q) => Some(&q.field),
            Query::TermInSetQuery(q) => Some(&q.field),
            Query::RangeQuery(q) => Some(&q.field),
            Query::GeoRadiusQuery(q) => Some(&q.field),
            Query::BooleanQuery(_) => None,
        }
    }
}

/// Matching strategy of a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Term,
    Text,
    TermSet,
    Range,
    GeoRadius,
    Boolean,
}

impl ClauseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseKind::Term => "term",
            ClauseKind::Text => "text",
            ClauseKind::TermSet => "term_set",
            ClauseKind::Range => "range",
            ClauseKind::GeoRadius => "geo_radius",
            ClauseKind::Boolean => "boolean",
        }
    }
}

/// Term query: field value must equal `text_value` exactly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermQuery {
    pub field: String,
    pub text_value: String,
}

/// Match query over an analyzed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub field: String,
    pub query: String,
    #[serde(default)]
    pub operator: MatchOperator,
}

/// How the terms of a match query combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOperator {
    /// Any term may match
    #[default]
    Should,
    /// Every term must match
    Must,
}

/// Term-in-set query: field value must be one of the terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermInSetQuery {
    pub field: String,
    pub text_terms: TextTerms,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextTerms {
    #[serde(default)]
    pub terms: Vec<String>,
}

/// Range query. Bounds are decimal strings; unset bounds are open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub lower_exclusive: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub upper_exclusive: bool,
}

/// Geo radius query: point field within `radius` meters of `center`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRadiusQuery {
    pub field: String,
    pub center: LatLng,
    pub radius: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Boolean query: clauses combined by their occurrence flags
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BooleanQuery {
    #[serde(default)]
    pub clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// One clause of a boolean query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanClause {
    pub query: Query,
    pub occur: Occur,
}

impl BooleanClause {
    /// Mandatory, non-scoring clause.
    pub fn filter(query: Query) -> Self {
        Self {
            query,
            occur: Occur::Filter,
        }
    }

    pub fn kind(&self) -> ClauseKind {
        self.query.kind()
    }
}

/// Clause occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occur {
    Should,
    Must,
    /// Must match, does not contribute to score
    Filter,
    MustNot,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Render a number as a decimal string with a fractional part: `3.0`, not `3`.
pub fn render_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
