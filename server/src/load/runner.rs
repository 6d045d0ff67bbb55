//! Load runner: spawns simulated users and drives their task loops

use chrono::Utc;
use futures_util::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::session::{HttpSession, parse_host};
use super::stats::{RequestStats, RunSummary};
use super::types::LoadError;
use super::user::UserBehavior;

/// Load run configuration
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Target base URL, e.g. `http://127.0.0.1:80`
    pub host: String,
    /// Number of simulated users
    pub users: usize,
    /// Users started per second (0 = all at once)
    pub spawn_rate: f64,
    /// Stop after this long
    pub run_time: Option<Duration>,
    /// Stop each user after this many task invocations
    pub iterations: Option<u64>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            users: 1,
            spawn_rate: 1.0,
            run_time: None,
            iterations: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl LoadConfig {
    pub fn validate(&self) -> Result<(), LoadError> {
        parse_host(&self.host)?;
        if self.users == 0 {
            return Err(LoadError::NoUsers);
        }
        if !self.spawn_rate.is_finite() || self.spawn_rate < 0.0 {
            return Err(LoadError::InvalidSpawnRate(self.spawn_rate));
        }
        // The gap between spawns must fit in a Duration
        if self.spawn_rate > 0.0 && Duration::try_from_secs_f64(1.0 / self.spawn_rate).is_err() {
            return Err(LoadError::InvalidSpawnRate(self.spawn_rate));
        }
        Ok(())
    }

    fn spawn_interval(&self) -> Option<Duration> {
        if self.spawn_rate > 0.0 {
            Duration::try_from_secs_f64(1.0 / self.spawn_rate).ok()
        } else {
            None
        }
    }
}

/// Stops a running load test from outside the runner
#[derive(Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Drives a [`UserBehavior`] against a target host
pub struct LoadRunner {
    config: LoadConfig,
    behavior: UserBehavior,
    session: HttpSession,
    stats: RequestStats,
    stop: StopHandle,
}

impl LoadRunner {
    pub fn new(config: LoadConfig, behavior: UserBehavior) -> Result<Self, LoadError> {
        config.validate()?;
        if !behavior.is_runnable() {
            return Err(LoadError::NoTasks(behavior.name().to_string()));
        }

        let stats = RequestStats::new();
        let session = HttpSession::new(&config.host, config.request_timeout, stats.clone())?;
        let (tx, _rx) = watch::channel(false);

        Ok(Self {
            config,
            behavior,
            session,
            stats,
            stop: StopHandle { tx: Arc::new(tx) },
        })
    }

    pub fn stats(&self) -> &RequestStats {
        &self.stats
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run until the run time elapses, every user finishes its iterations,
    /// or the stop handle fires
    pub async fn run(&self) -> RunSummary {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut stop_rx = self.stop.tx.subscribe();

        info!(
            "Starting {} users of {} against {} ({} users/s)",
            self.config.users,
            self.behavior.name(),
            self.config.host,
            self.config.spawn_rate
        );

        let timer = self.config.run_time.map(|run_time| {
            let stop = self.stop.clone();
            tokio::spawn(async move {
                tokio::time::sleep(run_time).await;
                info!("Run time of {:?} reached, stopping users", run_time);
                stop.stop();
            })
        });

        let mut handles = Vec::with_capacity(self.config.users);
        for user_id in 0..self.config.users {
            if *stop_rx.borrow() {
                break;
            }

            handles.push(tokio::spawn(run_user(
                user_id,
                self.behavior.clone(),
                self.session.clone(),
                self.config.iterations,
                self.stop.tx.subscribe(),
            )));

            if user_id + 1 < self.config.users
                && let Some(interval) = self.config.spawn_interval()
            {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = stop_rx.changed() => {}
                }
            }
        }

        let spawned = handles.len();
        debug!("Spawned {} users", spawned);

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!("User task panicked: {}", e);
            }
        }

        if let Some(timer) = timer {
            timer.abort();
        }

        let duration = start.elapsed();
        info!(
            "Load run finished after {:.1}s: {} requests",
            duration.as_secs_f64(),
            self.stats.total_requests()
        );

        RunSummary::new(&self.config.host, spawned, started_at, duration, &self.stats)
    }
}

async fn run_user(
    user_id: usize,
    behavior: UserBehavior,
    session: HttpSession,
    iterations: Option<u64>,
    mut stop: watch::Receiver<bool>,
) {
    let mut rng = StdRng::from_os_rng();
    let mut completed: u64 = 0;

    loop {
        if *stop.borrow() {
            break;
        }
        if let Some(limit) = iterations
            && completed >= limit
        {
            break;
        }

        let Some(task) = behavior.pick_task(&mut rng) else {
            break;
        };

        tokio::select! {
            _ = task.run(&session) => {}
            _ = stop.changed() => break,
        }
        completed += 1;

        if iterations.is_some_and(|limit| completed >= limit) {
            break;
        }

        let delay = behavior.wait_time().next_delay(&mut rng);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = stop.changed() => break,
            }
        }
    }

    debug!("User {} finished after {} tasks", user_id, completed);
}
