use common_connect_jwt::ConfigStore;
use connect_addon::{build_router, AddonConfig, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AddonConfig::from_env()?;
    let addr = config.socket_addr()?;
    let state = AppState::new(config, ConfigStore::new());
    let app = build_router(state);

    tracing::info!(%addr, "starting connect-addon");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
