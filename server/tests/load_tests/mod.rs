//! Load testing tiers for the relay
//!
//! - **Smoke**: Quick CI validation on every push (<30s)
//! - **Standard**: PR merge gate (~1min)
//! - **Stress**: Manual/release testing (~2min)
//!
//! The target relay is taken from `RELAY_URL` (default `http://127.0.0.1:80`).

use spinrelay::load::{LoadConfig, LoadError, RunSummary, WaitTime};
use std::time::Duration;

/// Performance budgets for `GET /get`
pub mod budgets {
    /// P99 latency budget in milliseconds
    pub const GET_P99_MAX_MS: f64 = 250.0;
    /// Maximum tolerated failure rate
    pub const ERROR_RATE_MAX: f64 = 0.01;
}

/// Benchmark tier for different testing scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkTier {
    /// Quick CI validation: 10 users, 10s
    Smoke,
    /// PR merge gate: 50 users, 30s
    Standard,
    /// Manual/release testing: 200 users, 60s
    Stress,
}

impl BenchmarkTier {
    /// Get the tier name for display
    pub fn name(&self) -> &'static str {
        match self {
            BenchmarkTier::Smoke => "SMOKE",
            BenchmarkTier::Standard => "STANDARD",
            BenchmarkTier::Stress => "STRESS",
        }
    }

    pub fn load_config(&self) -> LoadConfig {
        let (users, spawn_rate, secs) = match self {
            BenchmarkTier::Smoke => (10, 10.0, 10),
            BenchmarkTier::Standard => (50, 25.0, 30),
            BenchmarkTier::Stress => (200, 50.0, 60),
        };

        LoadConfig {
            host: std::env::var("RELAY_URL").unwrap_or_else(|_| "http://127.0.0.1:80".into()),
            users,
            spawn_rate,
            run_time: Some(Duration::from_secs(secs)),
            request_timeout: Duration::from_secs(5),
            ..LoadConfig::default()
        }
    }

    /// Think time between requests for this tier
    pub fn wait_time(&self) -> Result<WaitTime, LoadError> {
        WaitTime::between(Duration::from_millis(50), Duration::from_millis(250))
    }
}

/// Minimum samples required to consider a latency measurement valid
const MIN_LATENCY_SAMPLES: u64 = 10;

/// Check if results meet performance budgets
pub fn meets_budgets(summary: &RunSummary) -> bool {
    let latency_ok = summary
        .endpoints
        .iter()
        .filter(|e| e.path == "/get")
        .all(|e| {
            e.requests >= MIN_LATENCY_SAMPLES
                && e
                    .p99_ms
                    .map(|p| p <= budgets::GET_P99_MAX_MS)
                    .unwrap_or(false)
        });

    latency_ok && summary.failure_rate() < budgets::ERROR_RATE_MAX
}
