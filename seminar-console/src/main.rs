//! seminar-console - Seminar Portal Backend
//!
//! User-facing portal for seminar (microlecture) resources: avatars,
//! speakers, voices, generation orders and TTS conversion jobs. Speaks
//! OAuth2 to the identity provider and dispatches TTS jobs to the external
//! worker through the message broker.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use seminar_console::config::ConsoleConfig;
use seminar_console::services::{FaceVerifier, MqttJobQueue, OAuth2Client, TtsJobQueue};
use seminar_console::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "seminar-console", about = "Seminar portal backend")]
struct Args {
    /// Path to the TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Starting seminar-console");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = ConsoleConfig::load(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let db = seminar_console::db::init_database_pool(&config.database.path).await?;
    info!("Database connection established");

    let config = Arc::new(config);
    let timeout = Duration::from_secs(config.http_timeout_seconds);

    let oauth = Arc::new(
        OAuth2Client::new(config.oauth2.clone(), timeout)
            .map_err(|e| anyhow::anyhow!("Failed to build identity client: {}", e))?,
    );
    let verifier = Arc::new(
        FaceVerifier::new(
            config.face_verify_enabled,
            &config.oauth2,
            oauth.clone(),
            timeout,
        )
        .map_err(|e| anyhow::anyhow!("Failed to build face verifier: {}", e))?,
    );
    info!(
        "Face verification {}",
        if config.face_verify_enabled { "enabled" } else { "bypassed" }
    );

    let jobs: Arc<dyn TtsJobQueue> = Arc::new(MqttJobQueue::connect(&config.broker));
    info!(
        "Broker: {}:{} topic {}",
        config.broker.host, config.broker.port, config.broker.topic
    );

    let http = reqwest::Client::builder().timeout(timeout).build()?;

    let state = AppState::new(db, config.clone(), oauth, verifier, jobs, http);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("Listening on http://{}", config.server.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
