// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Clause Builders - one filter entry to zero-or-one FILTER clause
//!
//! Each builder is total: it either returns exactly one well-formed clause or
//! `None` when there is nothing to filter on. Builders never fail.
//!
//! | Input                          | Clause             |
//! |--------------------------------|--------------------|
//! | exact `"Boston"`               | `termQuery`        |
//! | exact `"New York"` (tokenized) | `matchQuery` (MUST)|
//! | text `"red shoes"`             | `matchQuery` (MUST)|
//! | one-of `["a", "b"]`            | `termInSetQuery`   |
//! | range `{gte, lt}`              | `rangeQuery`       |
//! | geo `{lat, lon, radius}`       | `geoRadiusQuery`   |
//!
//! # Tokenization heuristic
//!
//! Without field-type metadata, an exact-match value is assumed to target an
//! analyzed text field when it contains whitespace, and is sent as a text
//! match instead of a term. Swap the heuristic with
//! [`ClauseBuilder::with_policy`]:
//!
//! ```rust
//! use nrtsearch_mcp::search::{ClauseBuilder, ClauseKind, Scalar};
//!
//! // Treat every value of "sku" as an exact keyword
//! let builder = ClauseBuilder::with_policy(|field: &str, value: &str| {
//!     field != "sku" && value.contains(char::is_whitespace)
//! });
//!
//! let clause = builder.exact("sku", &Scalar::from("AB 12")).unwrap();
//! assert_eq!(clause.kind(), ClauseKind::Term);
//! ```

use super::filters::{FilterValue, GeoRadius, RangeBounds, Scalar};
use super::query::{
    render_decimal, BooleanClause, GeoRadiusQuery, LatLng, MatchOperator, MatchQuery, Query,
    RangeQuery, TermInSetQuery, TermQuery, TextTerms,
};

/// Decides whether an exact-match value targets an analyzed field.
pub trait TokenizationPolicy: Send + Sync {
    fn is_tokenized(&self, field: &str, value: &str) -> bool;
}

/// Default policy: any whitespace character means analyzed text.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceHeuristic;

impl TokenizationPolicy for WhitespaceHeuristic {
    fn is_tokenized(&self, _field: &str, value: &str) -> bool {
        value.contains(char::is_whitespace)
    }
}

impl<F> TokenizationPolicy for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_tokenized(&self, field: &str, value: &str) -> bool {
        self(field, value)
    }
}

/// Builds FILTER clauses from typed filter values
#[derive(Debug, Clone, Default)]
pub struct ClauseBuilder<P = WhitespaceHeuristic> {
    policy: P,
}

impl ClauseBuilder {
    pub fn new() -> Self {
        Self {
            policy: WhitespaceHeuristic,
        }
    }
}

impl<P: TokenizationPolicy> ClauseBuilder<P> {
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Dispatch on the filter category.
    pub fn build(&self, field: &str, value: FilterValue<'_>) -> Option<BooleanClause> {
        match value {
            FilterValue::Exact(v) => self.exact(field, v),
            FilterValue::Text(v) => self.text(field, v),
            FilterValue::OneOf(v) => self.one_of(field, v),
            FilterValue::Range(v) => self.range(field, v),
            FilterValue::GeoRadius(v) => self.geo_radius(field, v),
        }
    }

    /// Term match, or text match when the policy says the value is tokenized.
    pub fn exact(&self, field: &str, value: &Scalar) -> Option<BooleanClause> {
        let value = value.to_string();
        if value.is_empty() {
            return None;
        }
        if self.policy.is_tokenized(field, &value) {
            return self.text(field, &value);
        }
        Some(BooleanClause::filter(Query::TermQuery(TermQuery {
            field: field.to_string(),
            text_value: value,
        })))
    }

    /// Text match requiring every term.
    pub fn text(&self, field: &str, value: &str) -> Option<BooleanClause> {
        if value.is_empty() {
            return None;
        }
        Some(BooleanClause::filter(Query::MatchQuery(MatchQuery {
            field: field.to_string(),
            query: value.to_string(),
            operator: MatchOperator::Must,
        })))
    }

    /// Term set membership over the non-empty string forms.
    pub fn one_of(&self, field: &str, values: &[Scalar]) -> Option<BooleanClause> {
        let terms: Vec<String> = values
            .iter()
            .map(Scalar::to_string)
            .filter(|term| !term.is_empty())
            .collect();
        if terms.is_empty() {
            return None;
        }
        Some(BooleanClause::filter(Query::TermInSetQuery(TermInSetQuery {
            field: field.to_string(),
            text_terms: TextTerms { terms },
        })))
    }

    /// Range clause; emitted for any non-empty bounds map, even one with no
    /// recognized bound keys.
    pub fn range(&self, field: &str, bounds: &RangeBounds) -> Option<BooleanClause> {
        if bounds.is_empty() {
            return None;
        }
        let mut range = RangeQuery {
            field: field.to_string(),
            ..Default::default()
        };
        if let Some(lower) = bounds.lower() {
            range.lower = Some(render_decimal(lower.value));
            range.lower_exclusive = lower.exclusive;
        }
        if let Some(upper) = bounds.upper() {
            range.upper = Some(render_decimal(upper.value));
            range.upper_exclusive = upper.exclusive;
        }
        Some(BooleanClause::filter(Query::RangeQuery(range)))
    }

    /// Geo radius clause; skipped unless lat, lon and radius are all present.
    pub fn geo_radius(&self, field: &str, geo: &GeoRadius) -> Option<BooleanClause> {
        let (latitude, longitude, radius) = geo.complete()?;
        Some(BooleanClause::filter(Query::GeoRadiusQuery(GeoRadiusQuery {
            field: field.to_string(),
            center: LatLng { latitude, longitude },
            radius: render_decimal(radius),
        })))
    }
}

/// Exact-match clause with the whitespace heuristic.
pub fn exact_match(field: &str, value: &Scalar) -> Option<BooleanClause> {
    ClauseBuilder::new().exact(field, value)
}

/// Text-match clause.
pub fn text_match(field: &str, value: &str) -> Option<BooleanClause> {
    ClauseBuilder::new().text(field, value)
}

/// One-of clause.
pub fn one_of_match(field: &str, values: &[Scalar]) -> Option<BooleanClause> {
    ClauseBuilder::new().one_of(field, values)
}

/// Range clause.
pub fn range_match(field: &str, bounds: &RangeBounds) -> Option<BooleanClause> {
    ClauseBuilder::new().range(field, bounds)
}

/// Geo radius clause.
pub fn geo_radius_match(field: &str, geo: &GeoRadius) -> Option<BooleanClause> {
    ClauseBuilder::new().geo_radius(field, geo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::{ClauseKind, Occur};

    fn range_of(clause: BooleanClause) -> RangeQuery {
        match clause.query {
            Query::RangeQuery(range) => range,
            other => panic!("Expected RangeQuery, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_emits_term() {
        let clause = exact_match("city", &Scalar::from("Boston")).unwrap();
        assert_eq!(clause.occur, Occur::Filter);
        assert_eq!(
            clause.query,
            Query::TermQuery(TermQuery {
                field: "city".to_string(),
                text_value: "Boston".to_string(),
            })
        );
    }

    #[test]
    fn test_exact_renders_numbers_and_booleans() {
        let clause = exact_match("rooms", &Scalar::from(3_i64)).unwrap();
        match clause.query {
            Query::TermQuery(TermQuery { text_value, .. }) => assert_eq!(text_value, "3"),
            _ => panic!("Expected TermQuery"),
        }

        let clause = exact_match("open", &Scalar::from(true)).unwrap();
        match clause.query {
            Query::TermQuery(TermQuery { text_value, .. }) => assert_eq!(text_value, "true"),
            _ => panic!("Expected TermQuery"),
        }
    }

    #[test]
    fn test_exact_with_whitespace_delegates_to_text() {
        let exact = exact_match("city", &Scalar::from("New York")).unwrap();
        let text = text_match("city", "New York").unwrap();
        assert_eq!(exact, text);
        assert_eq!(exact.kind(), ClauseKind::Text);
    }

    #[test]
    fn test_exact_tab_counts_as_whitespace() {
        let clause = exact_match("city", &Scalar::from("New\tYork")).unwrap();
        assert_eq!(clause.kind(), ClauseKind::Text);
    }

    #[test]
    fn test_exact_empty_is_skipped() {
        assert!(exact_match("city", &Scalar::from("")).is_none());
    }

    #[test]
    fn test_custom_policy_overrides_heuristic() {
        let builder = ClauseBuilder::with_policy(|_: &str, _: &str| false);
        let clause = builder.exact("city", &Scalar::from("New York")).unwrap();
        assert_eq!(clause.kind(), ClauseKind::Term);

        let builder = ClauseBuilder::with_policy(|_: &str, _: &str| true);
        let clause = builder.exact("city", &Scalar::from("Boston")).unwrap();
        assert_eq!(clause.kind(), ClauseKind::Text);
    }

    #[test]
    fn test_text_requires_all_terms() {
        let clause = text_match("title", "red shoes").unwrap();
        assert_eq!(
            clause.query,
            Query::MatchQuery(MatchQuery {
                field: "title".to_string(),
                query: "red shoes".to_string(),
                operator: MatchOperator::Must,
            })
        );
        assert!(text_match("title", "").is_none());
    }

    #[test]
    fn test_one_of_drops_empty_strings() {
        let values = vec![Scalar::from("a"), Scalar::from(""), Scalar::from(7_i64), Scalar::from("a")];
        let clause = one_of_match("tags", &values).unwrap();
        match clause.query {
            Query::TermInSetQuery(q) => {
                assert_eq!(q.field, "tags");
                assert_eq!(q.text_terms.terms, vec!["a", "7", "a"]);
            }
            _ => panic!("Expected TermInSetQuery"),
        }
    }

    #[test]
    fn test_one_of_all_empty_is_skipped() {
        assert!(one_of_match("tags", &[]).is_none());
        assert!(one_of_match("tags", &[Scalar::from(""), Scalar::from("")]).is_none());
    }

    #[test]
    fn test_range_gte_lt() {
        let range = range_of(range_match("age", &RangeBounds::new().gte(3.0).lt(10.0)).unwrap());
        assert_eq!(range.field, "age");
        assert_eq!(range.lower.as_deref(), Some("3.0"));
        assert!(!range.lower_exclusive);
        assert_eq!(range.upper.as_deref(), Some("10.0"));
        assert!(range.upper_exclusive);
    }

    #[test]
    fn test_range_gt_only() {
        let range = range_of(range_match("score", &RangeBounds::new().gt(0.5)).unwrap());
        assert_eq!(range.lower.as_deref(), Some("0.5"));
        assert!(range.lower_exclusive);
        assert_eq!(range.upper, None);
    }

    #[test]
    fn test_range_both_lower_keys_prefers_inclusive() {
        let range = range_of(range_match("age", &RangeBounds::new().gt(1.0).gte(2.0)).unwrap());
        assert_eq!(range.lower.as_deref(), Some("2.0"));
        assert!(!range.lower_exclusive);
    }

    #[test]
    fn test_range_large_bound_keeps_fraction() {
        let range = range_of(range_match("price", &RangeBounds::new().gte(1e16)).unwrap());
        assert_eq!(range.lower.as_deref(), Some("10000000000000000.0"));
        assert!(!range.lower_exclusive);
    }

    #[test]
    fn test_range_empty_is_skipped() {
        assert!(range_match("age", &RangeBounds::new()).is_none());
    }

    #[test]
    fn test_range_unrecognized_keys_still_emit() {
        let bounds = RangeBounds {
            unrecognized: vec!["between".to_string()],
            ..Default::default()
        };
        let range = range_of(range_match("age", &bounds).unwrap());
        assert_eq!(range.field, "age");
        assert_eq!(range.lower, None);
        assert_eq!(range.upper, None);
    }

    #[test]
    fn test_geo_radius() {
        let clause = geo_radius_match("location", &GeoRadius::new(1.0, 2.0, 500.0)).unwrap();
        assert_eq!(
            clause.query,
            Query::GeoRadiusQuery(GeoRadiusQuery {
                field: "location".to_string(),
                center: LatLng {
                    latitude: 1.0,
                    longitude: 2.0,
                },
                radius: "500.0".to_string(),
            })
        );
    }

    #[test]
    fn test_geo_radius_missing_key_is_skipped() {
        let geo = GeoRadius {
            lat: Some(1.0),
            lon: Some(2.0),
            radius: None,
        };
        assert!(geo_radius_match("location", &geo).is_none());
    }

    #[test]
    fn test_build_dispatches_by_category() {
        let builder = ClauseBuilder::new();
        let bounds = RangeBounds::new().lte(5.0);
        let clause = builder.build("price", FilterValue::Range(&bounds)).unwrap();
        assert_eq!(clause.kind(), ClauseKind::Range);

        let scalars = [Scalar::from("x")];
        let clause = builder.build("tags", FilterValue::OneOf(&scalars)).unwrap();
        assert_eq!(clause.kind(), ClauseKind::TermSet);
    }
}
