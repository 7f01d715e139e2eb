//! Listener setup and graceful shutdown.

use std::path::Path;
use std::sync::Arc;

use common::{Error, PlannerConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::aggregate::TripAggregator;
use crate::http::{router, AppState};

/// Run the trip service until Ctrl+C or SIGTERM.
pub async fn serve(cfg: &PlannerConfig) -> Result<(), Error> {
    info!("Initializing providers...");
    let state = AppState {
        aggregator: Arc::new(TripAggregator::from_config(cfg)?),
    };

    let static_dir = cfg.static_dir.as_deref().map(Path::new);
    if let Some(dir) = static_dir {
        if dir.is_dir() {
            info!("Serving static files from {}", dir.display());
        } else {
            warn!("Static directory {} does not exist", dir.display());
        }
    }

    let app = router(state, static_dir);

    let address = format!("0.0.0.0:{}", cfg.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
