// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the nrtsearch tools.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding process is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `nrtsearch_mcp_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: search, indices, state
//! - `tool`: search, list_indices, get_index_state
//! - `status`: success, error
//! - `kind`: term, text, term_set, range, geo_radius

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record the outcome of one backend round trip
pub fn record_backend_call(operation: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    counter!(
        "nrtsearch_mcp_backend_calls_total",
        "operation" => operation.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record backend round-trip latency
pub fn record_backend_latency(operation: &str, duration: Duration) {
    histogram!(
        "nrtsearch_mcp_backend_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record clauses in a composed boolean query
pub fn record_clauses(count: usize) {
    histogram!("nrtsearch_mcp_query_clauses").record(count as f64);
}

/// Count one composed clause by kind
pub fn record_clause_kind(kind: &'static str) {
    counter!("nrtsearch_mcp_clauses_total", "kind" => kind).increment(1);
}

/// Record a tool invocation
pub fn record_tool_call(tool: &str, status: &str) {
    counter!(
        "nrtsearch_mcp_tool_calls_total",
        "tool" => tool.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// A timing guard that records backend latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_backend_latency(self.operation, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    #[test]
    fn test_record_backend_call_counts() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_backend_call("search", true);
            record_backend_call("search", true);
            record_backend_call("indices", false);
        });

        let counters: Vec<(String, u64)> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(n) => Some((key.key().name().to_string(), n)),
                _ => None,
            })
            .collect();

        let total: u64 = counters
            .iter()
            .filter(|(name, _)| name == "nrtsearch_mcp_backend_calls_total")
            .map(|(_, n)| n)
            .sum();
        assert_eq!(total, 3);
        assert_eq!(counters.len(), 2);
    }

    #[test]
    fn test_record_clauses_histogram() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_clauses(2);
            record_clauses(0);
        });

        let histograms: Vec<usize> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Histogram(samples) if key.key().name() == "nrtsearch_mcp_query_clauses" => {
                    Some(samples.len())
                }
                _ => None,
            })
            .collect();
        assert_eq!(histograms, vec![2]);
    }

    #[test]
    fn test_record_tool_call_labels() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            record_tool_call("list_indices", "success");
            record_tool_call("list_indices", "success");
            record_tool_call("search", "error");
        });

        let mut calls: Vec<(String, String, u64)> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(n) if key.key().name() == "nrtsearch_mcp_tool_calls_total" => {
                    let label = |name: &str| {
                        key.key()
                            .labels()
                            .find(|l| l.key() == name)
                            .map(|l| l.value().to_string())
                    };
                    Some((label("tool")?, label("status")?, n))
                }
                _ => None,
            })
            .collect();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                ("list_indices".to_string(), "success".to_string(), 2),
                ("search".to_string(), "error".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_latency_timer_records_on_drop() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let _timer = LatencyTimer::new("search");
            std::thread::sleep(Duration::from_micros(10));
        });

        let samples: Vec<f64> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Histogram(samples)
                    if key.key().name() == "nrtsearch_mcp_backend_seconds" =>
                {
                    Some(samples.into_iter().map(|s| s.into_inner()).collect::<Vec<_>>())
                }
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(samples.len(), 1);
        assert!(samples[0] > 0.0);
    }
}
