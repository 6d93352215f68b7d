//! Router assembly and server entry point.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use melies_error::{MeliesResult, ServerError};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Build the API router over the given state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/improve-prompt", post(handlers::improve_prompt))
        .route("/api/generate-script", post(handlers::generate_script))
        .route("/api/generate-audio", post(handlers::generate_audio))
        .route("/api/generate-video", post(handlers::generate_video))
        .route("/api/jobs/:id", get(handlers::get_job))
        .route("/api/health", get(handlers::health))
        .route("/media/*path", get(handlers::serve_media))
        .with_state(state)
}

/// Bind `addr` and serve the API until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> MeliesResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| ServerError::new(format!("Failed to bind {addr}: {err}")))?;
    info!(%addr, "serving API");
    axum::serve(listener, create_router(state))
        .await
        .map_err(|err| ServerError::new(format!("Server stopped: {err}")))?;
    Ok(())
}
