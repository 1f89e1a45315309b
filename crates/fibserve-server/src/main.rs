//! fibserve
//!
//! - Fibonacci endpoint: GET /?n=<0..=1000>
//! - Metrics scrape endpoint on a second listener (and under /metrics)
//! - Logging initialised from config before anything else runs
//! - Graceful shutdown on SIGINT/SIGTERM

use std::process::ExitCode;

use tokio::sync::watch;

use fibserve_core::error::Result;
use fibserve_server::{app_state::AppState, config, obs, server};

#[tokio::main]
async fn main() -> ExitCode {
    let explicit = std::env::var(config::CONFIG_ENV).ok();
    let cfg = match config::load_or_default(explicit.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("fibserve: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = obs::logging::init(&cfg.log) {
        eprintln!("fibserve: {e}");
        return ExitCode::FAILURE;
    }

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fibserve failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: config::ServiceConfig) -> Result<()> {
    let (main_listener, metrics_listener) = server::bind(&cfg.server).await?;
    let state = AppState::new(cfg);

    let (tx, rx) = watch::channel(false);
    let signal_state = state.clone();
    tokio::spawn(async move {
        server::shutdown_signal().await;
        signal_state.set_draining();
        let _ = tx.send(true);
    });

    server::serve(main_listener, metrics_listener, state, rx).await
}
