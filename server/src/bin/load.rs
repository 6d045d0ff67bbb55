use anyhow::Result;
use clap::Parser;
use spinrelay::load::{LoadConfig, LoadRunner, WaitTime, quickstart_user};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Spinrelay load generator
#[derive(Parser, Debug)]
#[command(name = "spinrelay-load")]
#[command(about = "Simulated users hammering the relay's GET /get endpoint")]
#[command(version)]
struct Cli {
    /// Target relay base URL
    #[arg(long, default_value = "http://localhost", env = "LOAD_HOST")]
    host: String,

    /// Number of simulated users
    #[arg(short, long, default_value = "1", env = "LOAD_USERS")]
    users: usize,

    /// Users started per second (0 = all at once)
    #[arg(short = 'r', long, default_value = "1", env = "LOAD_SPAWN_RATE")]
    spawn_rate: f64,

    /// Stop after this many seconds (runs until Ctrl+C when neither this nor --iterations is set)
    #[arg(short = 't', long, env = "LOAD_RUN_TIME")]
    run_time: Option<u64>,

    /// Stop each user after this many task invocations
    #[arg(long, env = "LOAD_ITERATIONS")]
    iterations: Option<u64>,

    /// Minimum wait between tasks in milliseconds
    #[arg(long, env = "LOAD_MIN_WAIT_MS")]
    min_wait_ms: Option<u64>,

    /// Maximum wait between tasks in milliseconds
    #[arg(long, env = "LOAD_MAX_WAIT_MS")]
    max_wait_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", env = "LOAD_REQUEST_TIMEOUT")]
    request_timeout: u64,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Exit with a non-zero status if any request failed
    #[arg(long)]
    fail_on_error: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn wait_time(&self) -> Result<WaitTime> {
        let wait = match (self.min_wait_ms, self.max_wait_ms) {
            (None, None) => WaitTime::None,
            (Some(ms), None) | (None, Some(ms)) => WaitTime::constant(Duration::from_millis(ms)),
            (Some(min), Some(max)) => {
                WaitTime::between(Duration::from_millis(min), Duration::from_millis(max))?
            }
        };
        Ok(wait)
    }

    fn load_config(&self) -> LoadConfig {
        LoadConfig {
            host: self.host.clone(),
            users: self.users,
            spawn_rate: self.spawn_rate,
            run_time: self.run_time.map(Duration::from_secs),
            iterations: self.iterations,
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "spinrelay=debug,spinrelay_load=debug"
    } else {
        "spinrelay=info,spinrelay_load=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let behavior = quickstart_user().with_wait_time(cli.wait_time()?);
    let config = cli.load_config();
    info!("Load configuration: {:?}", config);
    info!("User behavior: {:?}", behavior);

    let runner = LoadRunner::new(config, behavior)?;

    let stop = runner.stop_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl+C received, stopping users");
                stop.stop();
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    let summary = runner.run().await;

    if cli.json {
        println!("{}", summary.to_json());
    } else {
        summary.print_summary();
    }

    if cli.fail_on_error && summary.total_failures > 0 {
        warn!("{} requests failed", summary.total_failures);
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
