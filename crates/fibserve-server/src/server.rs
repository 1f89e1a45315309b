//! Listener lifecycle: bind both ports, serve them together, drain on signal.

use tokio::net::TcpListener;
use tokio::sync::watch;

use fibserve_core::error::{FibServeError, Result};

use crate::app_state::AppState;
use crate::config::ServerSection;
use crate::router;

/// Bind the main and metrics listeners.
pub async fn bind(cfg: &ServerSection) -> Result<(TcpListener, TcpListener)> {
    let listen = cfg.listen_addr()?;
    let metrics_listen = cfg.metrics_addr()?;

    let main = TcpListener::bind(listen)
        .await
        .map_err(|e| FibServeError::Internal(format!("failed to bind {listen}: {e}")))?;
    let metrics = TcpListener::bind(metrics_listen)
        .await
        .map_err(|e| FibServeError::Internal(format!("failed to bind {metrics_listen}: {e}")))?;
    Ok((main, metrics))
}

/// Serve both listeners until `shutdown` flips to `true`, then drain.
pub async fn serve(
    main: TcpListener,
    metrics: TcpListener,
    state: AppState,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let main_addr = main
        .local_addr()
        .map_err(|e| FibServeError::Internal(format!("main listener: {e}")))?;
    let metrics_addr = metrics
        .local_addr()
        .map_err(|e| FibServeError::Internal(format!("metrics listener: {e}")))?;

    let app = router::build_router(state.clone());
    let scrape = router::build_metrics_router(state);

    tracing::info!(%main_addr, %metrics_addr, "fibserve starting");

    let main_shutdown = shutdown.clone();
    let main_srv = async move {
        axum::serve(main, app)
            .with_graceful_shutdown(wait_for_shutdown(main_shutdown))
            .await
    };
    let metrics_srv = async move {
        axum::serve(metrics, scrape)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await
    };

    tokio::try_join!(main_srv, metrics_srv)
        .map_err(|e| FibServeError::Internal(format!("server failed: {e}")))?;

    tracing::info!("fibserve stopped");
    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    // a dropped sender also ends the wait
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Resolve on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("signal received, starting graceful shutdown");
}
