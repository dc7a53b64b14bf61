//! Event Tracker API Server
//!
//! Run with: cargo run --bin event-tracker-api
//!
//! # Configuration
//!
//! Config file from `--config` / `EVENT_TRACKER_CONFIG`, else the standard
//! locations (see `event_tracker::config`). Environment overrides:
//! - `EVENT_TRACKER_DATABASE`: SQLite dataset file
//! - `EVENT_TRACKER_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `EVENT_TRACKER_API_PORT`: Port to listen on (default: 8080)
//! - `EVENT_TRACKER_CREDENTIALS`: Credentials file with public_key / private_key
//! - `EVENT_TRACKER_LOG_LEVEL`, `EVENT_TRACKER_LOG_FORMAT`
//! - `RUST_LOG`: Full filter directive, wins over the log level
//!
//! The server refuses to start without a valid credentials file.

use clap::Parser;
use event_tracker::api::{serve, AppState};
use event_tracker::config::Config;
use event_tracker::logging::init_logging;
use event_tracker::store::EventStore;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "event-tracker-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the event tracking dataset over HTTP")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long, env = "EVENT_TRACKER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("event-tracker-api: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Event Tracker API failed");
            eprintln!("event-tracker-api: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Event Tracker API server v{}", env!("CARGO_PKG_VERSION"));

    let credentials = config.auth.load_credentials()?;
    tracing::info!(
        credentials = ?config.auth.credentials_file,
        public_key = %credentials.public_key,
        "API credentials loaded"
    );

    let window = config.event.window();
    tracing::info!("Event: {} ({})", config.event.name, window);

    let store = Arc::new(EventStore::open(&config.store, window)?);
    let counts = store.counts().await?;
    tracing::info!(%counts, "Dataset store ready");

    let state = AppState::new(Arc::clone(&store), config.api, config.event, credentials);
    serve(state).await?;

    tracing::info!("Event Tracker API server stopped");
    Ok(())
}
