use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use spinrelay::app::build_app;
use spinrelay::config::Config;
use spinrelay::relay::{RelayService, SpinStore, SpinitronSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the Prometheus metrics recorder
fn setup_prometheus_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize Prometheus metrics recorder (must be done before any metrics are recorded)
    let prometheus_handle = setup_prometheus_metrics();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spinrelay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, port={}",
        config.host, config.port
    );
    info!("Upstream: {:?}", config.upstream);
    if config.upstream.access_token.is_none() {
        warn!("SPIN_KEY is not set - /update will fail until it is configured");
    }

    let source = SpinitronSource::new(&config.upstream)?;
    let relay = RelayService::new(Arc::new(source), SpinStore::new());

    // Prime the cache; a failure here leaves /get serving null
    if let Err(e) = relay.refresh().await {
        warn!("Initial spin refresh failed: {}", e);
    }

    // Periodic refresh, if configured
    if let Some(every) = config.upstream.refresh_interval {
        info!("Refreshing spins every {:?}", every);
        let refresher = relay.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // The first tick fires immediately and the cache was just primed
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = refresher.refresh().await {
                    debug!("Periodic refresh skipped, keeping cached spins: {}", e);
                }
            }
        });
    }

    let app = build_app(relay, Some(prometheus_handle));

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Spinrelay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
