// churn-form-rs/src/main.rs
// Churn Form - HTML form in front of a remote churn scoring endpoint
// Default port 5000
//
// GET /        input form
// POST /       score the submitted customer and show the result
// GET /health  liveness document

use std::sync::Arc;

use anyhow::Context;
use churn_form::ChurnForm;
use config_rs::AppConfig;
use scoring_sdk::ScoringClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    config.log_summary();

    let mut builder = ScoringClient::builder()
        .timeout(config.timeout_seconds)
        .danger_accept_invalid_certs(config.accept_invalid_certs);
    if let Some(url) = &config.scoring_url {
        builder = builder.endpoint(url.clone());
    }
    if let Some(token) = &config.token {
        builder = builder.token(token.clone());
    }
    let client = builder.build().context("failed to configure scoring client")?;

    let app = Arc::new(ChurnForm::new(Arc::new(client))).create_router();

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    log::info!("Churn form starting on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Churn form stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
