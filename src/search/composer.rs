// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Composer - filters + request parameters → one `SearchRequest`
//!
//! Clauses are appended category by category (exact → text → one-of →
//! range → geo-radius), each category in caller insertion order. Every
//! clause is a FILTER clause, so the order carries no meaning for the
//! backend; it only keeps requests reproducible.

use tracing::debug;

use super::clause_builder::{ClauseBuilder, TokenizationPolicy, WhitespaceHeuristic};
use super::filters::{FilterSpecification, FilterValue};
use super::query::{BooleanQuery, Query};
use crate::client::messages::SearchRequest;
use crate::metrics;

/// Retrieve-fields wildcard: all stored fields
pub const ALL_FIELDS: &str = "*";

/// Per-request parameters other than filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub index_name: String,
    /// Maximum hits to return
    pub size: i32,
    /// `None` retrieves every field; `Some(vec![])` retrieves none.
    pub retrieve_fields: Option<Vec<String>>,
}

impl SearchParams {
    pub fn new(index_name: impl Into<String>, size: i32) -> Self {
        Self {
            index_name: index_name.into(),
            size,
            retrieve_fields: None,
        }
    }

    pub fn retrieve_fields(mut self, fields: Vec<String>) -> Self {
        self.retrieve_fields = Some(fields);
        self
    }

    /// Field list as sent to the backend.
    pub fn resolved_retrieve_fields(&self) -> Vec<String> {
        match &self.retrieve_fields {
            Some(fields) => fields.clone(),
            None => vec![ALL_FIELDS.to_string()],
        }
    }
}

/// Composes boolean filter queries and search requests
#[derive(Debug, Clone, Default)]
pub struct QueryComposer<P = WhitespaceHeuristic> {
    builder: ClauseBuilder<P>,
}

impl QueryComposer {
    pub fn new() -> Self {
        Self {
            builder: ClauseBuilder::new(),
        }
    }
}

impl<P: TokenizationPolicy> QueryComposer<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            builder: ClauseBuilder::with_policy(policy),
        }
    }

    /// Build the boolean filter tree for a filter specification.
    pub fn compose_query(&self, filters: &FilterSpecification) -> BooleanQuery {
        let mut query = BooleanQuery::default();
        for (field, value) in filters.values() {
            if let FilterValue::Range(bounds) = value {
                if bounds.has_conflicting_bounds() {
                    debug!(
                        field,
                        "Range sets both inclusive and exclusive variants of a bound, using inclusive"
                    );
                }
            }
            if let Some(clause) = self.builder.build(field, value) {
                query.clauses.push(clause);
            }
        }
        query
    }

    /// Build the full search request.
    pub fn compose(&self, params: &SearchParams, filters: &FilterSpecification) -> SearchRequest {
        let query = self.compose_query(filters);

        debug!(
            index = %params.index_name,
            filters = filters.len(),
            clauses = query.len(),
            "Composed search request"
        );
        metrics::record_clauses(query.len());
        for clause in &query.clauses {
            metrics::record_clause_kind(clause.kind().as_str());
        }

        SearchRequest {
            index_name: params.index_name.clone(),
            top_hits: params.size,
            retrieve_fields: params.resolved_retrieve_fields(),
            query: Query::BooleanQuery(query),
        }
    }
}
