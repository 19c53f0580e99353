use anyhow::Context;

use accounthub_api::app::{build_app, services::build_services};
use accounthub_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    accounthub_observability::init();

    let config = ApiConfig::from_env()?;
    let services = build_services(&config)
        .await
        .context("failed to initialize persistence")?;
    tracing::info!(backend = services.backend(), "persistence ready");

    let app = build_app(services, config.jwt_secret.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
