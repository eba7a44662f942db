use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use solve_relay::adapters::ai::provider_from_config;
use solve_relay::adapters::http::{app_router, FlowSettingsSet, SolveAppState};
use solve_relay::adapters::ocr::{TesseractConfig, TesseractOcr};
use solve_relay::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    config.validate()?;
    tracing::info!(
        environment = ?config.server.environment,
        provider = config.ai.provider.as_str(),
        "configuration loaded"
    );

    let ai_provider = provider_from_config(&config.ai)?;
    let ocr = Arc::new(TesseractOcr::new(TesseractConfig {
        binary: config.ocr.binary.clone(),
        language: config.ocr.language.clone(),
        timeout: config.ocr.timeout(),
    }));

    let info = ai_provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "ai provider ready");

    let state = SolveAppState::new(ai_provider, ocr, FlowSettingsSet::from(&config.ai));
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
