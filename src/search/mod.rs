// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Composition
//!
//! Turns loosely shaped agent filters into the nrtsearch boolean query tree.
//!
//! # Architecture
//!
//! ```text
//! FilterSpecification (exact / text / one-of / range / geo-radius maps)
//!     ↓  one entry at a time
//! ClauseBuilder → Option<BooleanClause>   (always FILTER occurrence)
//!     ↓  appended in category order
//! QueryComposer → SearchRequest { indexName, topHits, retrieveFields, query }
//! ```
//!
//! # Example
//!
//! ```rust
//! use nrtsearch_mcp::search::{
//!     ClauseKind, FilterSpecification, Query, QueryComposer, RangeBounds, SearchParams,
//! };
//!
//! let filters = FilterSpecification::new()
//!     .exact("city", "Boston")
//!     .range("price", RangeBounds::new().lte(100.0));
//!
//! let request = QueryComposer::new().compose(&SearchParams::new("listings", 10), &filters);
//! assert_eq!(request.index_name, "listings");
//! assert_eq!(request.top_hits, 10);
//!
//! let Query::BooleanQuery(tree) = &request.query else { panic!() };
//! let kinds: Vec<ClauseKind> = tree.clauses.iter().map(|c| c.kind()).collect();
//! assert_eq!(kinds, vec![ClauseKind::Term, ClauseKind::Range]);
//! ```

mod clause_builder;
mod composer;
mod filters;
mod query;

pub use clause_builder::{
    exact_match, geo_radius_match, one_of_match, range_match, text_match, ClauseBuilder,
    TokenizationPolicy, WhitespaceHeuristic,
};
pub use composer::{QueryComposer, SearchParams, ALL_FIELDS};
pub use filters::{
    Bound, FilterSpecification, FilterValue, GeoRadius, OneOfValues, RangeBounds, Scalar,
};
pub use query::{
    render_decimal, BooleanClause, BooleanQuery, ClauseKind, GeoRadiusQuery, LatLng,
    MatchOperator, MatchQuery, Occur, Query, RangeQuery, TermInSetQuery, TermQuery, TextTerms,
};
