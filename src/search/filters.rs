// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter Specification - typed filter inputs
//!
//! Callers hand over loosely shaped JSON maps (field → value, field → list,
//! field → bounds map). They are validated once here, at the edge, into a
//! closed set of shapes so the clause builders never inspect raw values.
//!
//! ```text
//! matchExact      {"city": "Boston"}                     → Scalar
//! matchText       {"title": "red shoes"}                 → String
//! matchOneOf      {"tags": ["rust", 7, true]}            → OneOfValues
//! matchRange      {"price": {"gte": 3, "lt": 10}}        → RangeBounds
//! matchGeoRadius  {"loc": {"lat": 1, "lon": 2, "radius": 500}} → GeoRadius
//! ```
//!
//! `null` categories and `null` field values are dropped during
//! deserialization; they never produce a clause.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// A primitive filter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Ordered one-of values; `null` entries are dropped
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Option<Scalar>>")]
pub struct OneOfValues(pub Vec<Scalar>);

impl From<Vec<Option<Scalar>>> for OneOfValues {
    fn from(values: Vec<Option<Scalar>>) -> Self {
        Self(values.into_iter().flatten().collect())
    }
}

impl From<Vec<Scalar>> for OneOfValues {
    fn from(values: Vec<Scalar>) -> Self {
        Self(values)
    }
}

impl OneOfValues {
    pub fn as_slice(&self) -> &[Scalar] {
        &self.0
    }
}

/// One side of a range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub exclusive: bool,
}

/// Range bounds from a `gt`/`gte`/`lt`/`lte` map.
///
/// When both variants of one side are given the inclusive one wins.
/// Keys other than the four bound keys are remembered so that a map holding
/// only unrecognized keys still counts as non-empty.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "IndexMap<String, f64>")]
pub struct RangeBounds {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
    pub unrecognized: Vec<String>,
}

impl From<IndexMap<String, f64>> for RangeBounds {
    fn from(map: IndexMap<String, f64>) -> Self {
        let mut bounds = RangeBounds::default();
        for (key, value) in map {
            match key.as_str() {
                "gt" => bounds.gt = Some(value),
                "gte" => bounds.gte = Some(value),
                "lt" => bounds.lt = Some(value),
                "lte" => bounds.lte = Some(value),
                _ => bounds.unrecognized.push(key),
            }
        }
        bounds
    }
}

impl RangeBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gt(mut self, value: f64) -> Self {
        self.gt = Some(value);
        self
    }

    pub fn gte(mut self, value: f64) -> Self {
        self.gte = Some(value);
        self
    }

    pub fn lt(mut self, value: f64) -> Self {
        self.lt = Some(value);
        self
    }

    pub fn lte(mut self, value: f64) -> Self {
        self.lte = Some(value);
        self
    }

    /// True when the source map had no keys at all.
    pub fn is_empty(&self) -> bool {
        self.gt.is_none()
            && self.gte.is_none()
            && self.lt.is_none()
            && self.lte.is_none()
            && self.unrecognized.is_empty()
    }

    pub fn lower(&self) -> Option<Bound> {
        match (self.gte, self.gt) {
            (Some(value), _) => Some(Bound { value, exclusive: false }),
            (None, Some(value)) => Some(Bound { value, exclusive: true }),
            (None, None) => None,
        }
    }

    pub fn upper(&self) -> Option<Bound> {
        match (self.lte, self.lt) {
            (Some(value), _) => Some(Bound { value, exclusive: false }),
            (None, Some(value)) => Some(Bound { value, exclusive: true }),
            (None, None) => None,
        }
    }

    /// Both `gt` and `gte`, or both `lt` and `lte`, were supplied.
    pub fn has_conflicting_bounds(&self) -> bool {
        (self.gt.is_some() && self.gte.is_some()) || (self.lt.is_some() && self.lte.is_some())
    }
}

/// Geo radius center and radius (meters). All three keys are required for a
/// clause; a partial map deserializes fine and is skipped by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "IndexMap<String, f64>")]
pub struct GeoRadius {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
}

impl From<IndexMap<String, f64>> for GeoRadius {
    fn from(map: IndexMap<String, f64>) -> Self {
        Self {
            lat: map.get("lat").copied(),
            lon: map.get("lon").copied(),
            radius: map.get("radius").copied(),
        }
    }
}

impl GeoRadius {
    pub fn new(lat: f64, lon: f64, radius: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            radius: Some(radius),
        }
    }

    /// `(lat, lon, radius)` when every key is present.
    pub fn complete(&self) -> Option<(f64, f64, f64)> {
        Some((self.lat?, self.lon?, self.radius?))
    }
}

/// A borrowed filter value, tagged by category
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterValue<'a> {
    Exact(&'a Scalar),
    Text(&'a str),
    OneOf(&'a [Scalar]),
    Range(&'a RangeBounds),
    GeoRadius(&'a GeoRadius),
}

/// Per-request filter bundle.
///
/// Every category is an insertion-ordered map; iteration via
/// [`FilterSpecification::values`] yields exact → text → one-of → range →
/// geo-radius, each in caller order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpecification {
    #[serde(default, deserialize_with = "non_null_entries")]
    pub match_exact: IndexMap<String, Scalar>,
    #[serde(default, deserialize_with = "non_null_entries")]
    pub match_text: IndexMap<String, String>,
    #[serde(default, deserialize_with = "non_null_entries")]
    pub match_one_of: IndexMap<String, OneOfValues>,
    #[serde(default, deserialize_with = "non_null_entries")]
    pub match_range: IndexMap<String, RangeBounds>,
    #[serde(default, deserialize_with = "non_null_entries")]
    pub match_geo_radius: IndexMap<String, GeoRadius>,
}

impl FilterSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact(mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.match_exact.insert(field.into(), value.into());
        self
    }

    pub fn text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.match_text.insert(field.into(), value.into());
        self
    }

    pub fn one_of(mut self, field: impl Into<String>, values: Vec<Scalar>) -> Self {
        self.match_one_of.insert(field.into(), OneOfValues(values));
        self
    }

    pub fn range(mut self, field: impl Into<String>, bounds: RangeBounds) -> Self {
        self.match_range.insert(field.into(), bounds);
        self
    }

    pub fn geo_radius(mut self, field: impl Into<String>, geo: GeoRadius) -> Self {
        self.match_geo_radius.insert(field.into(), geo);
        self
    }

    /// Number of (field, value) entries across all categories.
    pub fn len(&self) -> usize {
        self.match_exact.len()
            + self.match_text.len()
            + self.match_one_of.len()
            + self.match_range.len()
            + self.match_geo_radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in composition order.
    pub fn values(&self) -> impl Iterator<Item = (&str, FilterValue<'_>)> + '_ {
        let exact = self
            .match_exact
            .iter()
            .map(|(f, v)| (f.as_str(), FilterValue::Exact(v)));
        let text = self
            .match_text
            .iter()
            .map(|(f, v)| (f.as_str(), FilterValue::Text(v.as_str())));
        let one_of = self
            .match_one_of
            .iter()
            .map(|(f, v)| (f.as_str(), FilterValue::OneOf(v.as_slice())));
        let range = self
            .match_range
            .iter()
            .map(|(f, v)| (f.as_str(), FilterValue::Range(v)));
        let geo = self
            .match_geo_radius
            .iter()
            .map(|(f, v)| (f.as_str(), FilterValue::GeoRadius(v)));

        exact.chain(text).chain(one_of).chain(range).chain(geo)
    }
}

/// Accept a missing or `null` map, and drop `null` values inside it.
fn non_null_entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<IndexMap<String, Option<T>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect())
}
