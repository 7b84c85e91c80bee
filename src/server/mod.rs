pub mod handlers;
mod types;

pub use handlers::{AppState, SharedClientPool};
pub use types::{GenerateRequest, GenerateResponse};

use crate::{
    Result,
    config::Config,
    llm::{GenerativeClient, VertexClient},
    pool::ClientPool,
};
use axum::{Router, routing::any};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the pool of Vertex AI clients and constructs the first one, so a
/// bad configuration fails the process before any traffic is served.
pub fn build_client_pool(config: &Config) -> Result<SharedClientPool> {
    let vertex = config.vertex.clone();
    let pool = ClientPool::new(move || {
        VertexClient::new(&vertex).map(|client| Box::new(client) as Box<dyn GenerativeClient>)
    });
    pool.warm(1)?;

    Ok(Arc::new(pool))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handlers::generate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<()> {
    let pool = build_client_pool(&config)?;

    let app_state = AppState {
        pool,
        context_timeout: config.server.context_timeout(),
    };

    let app = build_router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (context timeout {}s)",
        addr, config.server.context_timeout_s
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
