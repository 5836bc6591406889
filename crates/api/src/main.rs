use anyhow::Context;

use ucash_infra::WalletConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ucash_observability::init();

    let config = WalletConfig::from_env()?;
    let services = ucash_api::app::build_services(&config)?;
    let app = ucash_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
