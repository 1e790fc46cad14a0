//! az-greeter entry point.
//!
//! Initializes tracing, loads configuration, builds the metadata client and
//! the router, and runs the HTTP server until a shutdown signal arrives.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use az_greeter::config::{AppConfig, DEFAULT_LOG_FILTER};
use az_greeter::http::start_server;
use az_greeter::{create_router, AppState};

/// az-greeter: reports the availability zone this host runs in
#[derive(Parser, Debug)]
#[command(name = "az-greeter", version, about)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "az_greeter=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override http.port from the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format is known
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(port) = args.port {
        config.http.port = port;
    }

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        config = args.config.as_deref().unwrap_or("<defaults>"),
        "Loaded configuration"
    );

    let state = AppState::new(&config)?;
    tracing::info!(
        url = %state.metadata.url(),
        connect_timeout_ms = config.metadata.connect_timeout_ms,
        timeout_ms = config.metadata.timeout_ms,
        "Metadata client configured"
    );

    let app = create_router(state);
    start_server(app, &config).await?;

    Ok(())
}
