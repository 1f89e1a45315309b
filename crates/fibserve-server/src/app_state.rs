//! Shared application state for the fibserve server.
//!
//! Owns the config and the metrics registry; handlers reach both only through
//! this state, never through globals.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServiceConfig;
use crate::obs::metrics::ServiceMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    metrics: ServiceMetrics,
    started: Instant,
}

impl AppState {
    pub fn new(cfg: ServiceConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: ServiceMetrics::new(),
                started: Instant::now(),
            }),
        }
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }

    pub fn set_draining(&self) {
        self.inner.metrics.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.metrics.is_draining()
    }

    /// Extra gauges appended to every metrics render.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![("fibserve_uptime_seconds", self.inner.started.elapsed().as_secs())]
    }
}
