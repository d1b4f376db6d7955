//! Binds the forwarder and serves until Ctrl-C.

use std::sync::Arc;

use operations::Transport;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ListenerConfig;
use crate::error::ListenerError;
use crate::routes::{router, AppState};

pub async fn serve(
    transport: Arc<dyn Transport>,
    config: ListenerConfig,
) -> Result<(), ListenerError> {
    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ListenerError::Bind {
            address: address.clone(),
            source,
        })?;

    if config.api_key.is_none() {
        info!("No API key configured; callers must send the {} header", crate::API_KEY_HEADER);
    }
    info!(%address, "Forwarder listening");

    let state = AppState::new(transport, config)?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| error!(error = %e, "Forwarder stopped with an error"))
        .map_err(ListenerError::Server)
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server keeps
/// running until killed.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
