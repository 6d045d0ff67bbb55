//! Request statistics collected during a load run

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::types::RequestOutcome;

/// Latency samples for one endpoint
#[derive(Debug, Default, Clone)]
pub struct LatencyStats {
    pub samples: Vec<Duration>,
}

impl LatencyStats {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn record(&mut self, latency: Duration) {
        self.samples.push(latency);
    }

    /// Calculate percentile (0-100)
    pub fn percentile(&self, p: f64) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort();

        let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        Some(sorted[idx.min(sorted.len() - 1)])
    }

    pub fn median(&self) -> Option<Duration> {
        self.percentile(50.0)
    }

    pub fn p95(&self) -> Option<Duration> {
        self.percentile(95.0)
    }

    pub fn p99(&self) -> Option<Duration> {
        self.percentile(99.0)
    }

    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().min().copied()
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }
}

#[derive(Debug, Default)]
struct EndpointStats {
    requests: u64,
    failures: u64,
    latencies: LatencyStats,
    statuses: BTreeMap<u16, u64>,
    errors: BTreeMap<String, u64>,
}

/// Thread-safe per-endpoint request statistics, keyed by `(method, path)`
#[derive(Debug, Clone, Default)]
pub struct RequestStats {
    entries: Arc<DashMap<(String, String), EndpointStats>>,
}

fn as_ms(d: Option<Duration>) -> Option<f64> {
    d.map(|d| d.as_secs_f64() * 1000.0)
}

impl RequestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request outcome
    pub fn record(&self, method: &str, path: &str, outcome: &RequestOutcome) {
        let mut entry = self
            .entries
            .entry((method.to_string(), path.to_string()))
            .or_default();

        entry.requests += 1;
        entry.latencies.record(outcome.latency);
        if let Some(status) = outcome.status {
            *entry.statuses.entry(status).or_insert(0) += 1;
        }
        if let Some(ref error) = outcome.error {
            entry.failures += 1;
            *entry.errors.entry(error.clone()).or_insert(0) += 1;
        }
    }

    /// Number of requests recorded for one endpoint
    pub fn requests_for(&self, method: &str, path: &str) -> u64 {
        self.entries
            .get(&(method.to_string(), path.to_string()))
            .map(|e| e.requests)
            .unwrap_or(0)
    }

    pub fn total_requests(&self) -> u64 {
        self.entries.iter().map(|e| e.requests).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.entries.iter().map(|e| e.failures).sum()
    }

    /// Summaries for every endpoint, ordered by method then path
    pub fn snapshot(&self) -> Vec<EndpointSummary> {
        let mut summaries: Vec<EndpointSummary> = self
            .entries
            .iter()
            .map(|entry| {
                let ((method, path), stats) = entry.pair();
                EndpointSummary {
                    method: method.clone(),
                    path: path.clone(),
                    requests: stats.requests,
                    failures: stats.failures,
                    min_ms: as_ms(stats.latencies.min()),
                    median_ms: as_ms(stats.latencies.median()),
                    mean_ms: as_ms(stats.latencies.mean()),
                    p95_ms: as_ms(stats.latencies.p95()),
                    p99_ms: as_ms(stats.latencies.p99()),
                    max_ms: as_ms(stats.latencies.max()),
                    statuses: stats.statuses.clone(),
                    errors: stats.errors.clone(),
                }
            })
            .collect();

        summaries.sort_by(|a, b| (&a.method, &a.path).cmp(&(&b.method, &b.path)));
        summaries
    }
}

/// Per-endpoint statistics in a run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSummary {
    pub method: String,
    pub path: String,
    pub requests: u64,
    pub failures: u64,
    pub min_ms: Option<f64>,
    pub median_ms: Option<f64>,
    pub mean_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub statuses: BTreeMap<u16, u64>,
    pub errors: BTreeMap<String, u64>,
}

/// Final report of a load run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub host: String,
    pub users: usize,
    pub duration_secs: f64,
    pub total_requests: u64,
    pub total_failures: u64,
    pub endpoints: Vec<EndpointSummary>,
}

impl RunSummary {
    pub fn new(
        host: &str,
        users: usize,
        started_at: DateTime<Utc>,
        duration: Duration,
        stats: &RequestStats,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            host: host.to_string(),
            users,
            duration_secs: duration.as_secs_f64(),
            total_requests: stats.total_requests(),
            total_failures: stats.total_failures(),
            endpoints: stats.snapshot(),
        }
    }

    /// Failure rate as a fraction (0.0 to 1.0)
    pub fn failure_rate(&self) -> f64 {
        if self.total_requests > 0 {
            self.total_failures as f64 / self.total_requests as f64
        } else {
            0.0
        }
    }

    pub fn requests_per_sec(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.total_requests as f64 / self.duration_secs
        } else {
            0.0
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }

    /// Print a human-readable summary table
    pub fn print_summary(&self) {
        let fmt_ms = |v: Option<f64>| v.map(|ms| format!("{:.1}", ms)).unwrap_or("-".into());

        println!("\n=== Load run {} ===", self.run_id);
        println!(
            "Host: {}  Users: {}  Duration: {:.1}s",
            self.host, self.users, self.duration_secs
        );
        println!(
            "\n{:<6} {:<20} {:>9} {:>7} {:>9} {:>9} {:>9} {:>9}",
            "Method", "Path", "Requests", "Fails", "Median", "P95", "P99", "Max"
        );
        for e in &self.endpoints {
            println!(
                "{:<6} {:<20} {:>9} {:>7} {:>9} {:>9} {:>9} {:>9}",
                e.method,
                e.path,
                e.requests,
                e.failures,
                fmt_ms(e.median_ms),
                fmt_ms(e.p95_ms),
                fmt_ms(e.p99_ms),
                fmt_ms(e.max_ms),
            );
            for (error, count) in &e.errors {
                println!("         {} x {}", count, error);
            }
        }
        println!(
            "\nTotal: {} requests, {} failures ({:.2}%), {:.1} req/s",
            self.total_requests,
            self.total_failures,
            self.failure_rate() * 100.0,
            self.requests_per_sec()
        );
    }
}
