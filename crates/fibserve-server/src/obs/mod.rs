//! Observability: explicit logging setup and the in-process metrics registry.
//!
//! Metrics are stored as atomics and rendered by the `/metrics` handlers on
//! both listeners.

pub mod logging;
pub mod metrics;
