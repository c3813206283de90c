use std::sync::Arc;

use anyhow::Context;

use storefront_api::app::{build_app, services::AppServices};
use storefront_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = ApiConfig::from_env();
    if config.catalog_path.is_none() {
        tracing::warn!("STOREFRONT_CATALOG_PATH not set; serving the built-in demo catalog");
    }

    let services = AppServices::from_config(&config)?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
