use anyhow::Result;
use axum::Router;
use repo_proxy::{AppState, config, routes};
use std::io::ErrorKind;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting repo-proxy with config: {:?}", cfg);

    if cfg.token.is_none() {
        tracing::warn!("GH_TOKEN not set; reads are unauthenticated and writes will fail");
    }
    if cfg.upload_secret.is_none() {
        tracing::warn!("UPLOAD_KEY not set; every upload will be rejected");
    }

    // --- Initialize gateway ---
    let state = AppState::from_config(&cfg)?;
    tracing::info!("Serving contents of {}", state.gateway.describe());

    // --- Build router ---
    let app: Router = routes().with_state(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
