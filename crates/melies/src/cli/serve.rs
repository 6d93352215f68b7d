//! HTTP server command handler.

use crate::cli::wire;
use melies::config::Settings;
use melies::{AppState, MeliesResult, serve};
use std::sync::Arc;
use tracing::info;

/// Bind the API server, with settings overridden by any flags given.
pub async fn handle_serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
) -> MeliesResult<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let addr = settings.socket_addr()?;
    let pipeline = Arc::new(wire::pipeline(&settings)?);
    let state = AppState::new(pipeline, &settings.media.store_root);

    info!(%addr, "serving the pipeline API");
    serve(addr, state).await
}
