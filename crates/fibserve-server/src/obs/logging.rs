//! Process-wide `tracing` subscriber, initialised once from config in `main`.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fibserve_core::error::{FibServeError, Result};

use crate::config::LogSection;

/// `RUST_LOG` wins over `log.filter` when set.
pub fn env_filter(cfg: &LogSection) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(f) => Ok(f),
        Err(_) => EnvFilter::try_new(&cfg.filter)
            .map_err(|e| FibServeError::InvalidConfig(format!("log.filter: {e}"))),
    }
}

/// Install stdout logging, plus an append-only file copy when `log.file` is set.
pub fn init(cfg: &LogSection) -> Result<()> {
    let filter = env_filter(cfg)?;

    let file_layer = match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| FibServeError::InvalidConfig(format!("open log file {path}: {e}")))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| FibServeError::Internal(format!("logging init failed: {e}")))
}
