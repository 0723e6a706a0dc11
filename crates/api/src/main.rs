use anyhow::Context;

use escola_infra::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    escola_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = escola_api::app::services::AppServices::from_config(&config)
        .await
        .context("failed to initialise professor store")?;

    let app = escola_api::app::build_app(config.jwt_secret.clone(), services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
