use anyhow::Result;
use call_sense::analysis::{AnalysisApi, HttpAnalysisClient};
use call_sense::crm::{CrmApi, HttpCrmClient};
use call_sense::{
    create_router, AppState, AudioSource, CallHistory, Config, SessionConfig, SessionController,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "call-sense", about = "Sales-call recording and sentiment assistant")]
struct Cli {
    /// Path to the configuration file (extension optional)
    #[arg(long, default_value = "config/call-sense")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} starting", cfg.service.name);

    let timeout = Duration::from_secs(cfg.analysis.request_timeout_secs);
    let analysis: Arc<dyn AnalysisApi> =
        Arc::new(HttpAnalysisClient::new(&cfg.analysis.base_url, timeout)?);
    let crm: Arc<dyn CrmApi> = Arc::new(HttpCrmClient::new(&cfg.crm.base_url, timeout)?);
    let history = Arc::new(CallHistory::new());

    let session_config = SessionConfig {
        session_id: format!("call-{}", Uuid::new_v4()),
        sample_rate: cfg.audio.sample_rate,
        channels: cfg.audio.channels,
        buffer_duration_ms: cfg.audio.buffer_duration_ms,
        source: AudioSource::Microphone,
        recordings_path: cfg.audio.recordings_path.clone().map(PathBuf::from),
    };
    let session = Arc::new(SessionController::new(
        session_config,
        Arc::clone(&analysis),
        Arc::clone(&history),
    ));

    let state = AppState::new(Arc::clone(&session), history, analysis, crm);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Teardown forces cleanup: no stream survives shutdown
    session.cleanup().await;
    info!("Shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
