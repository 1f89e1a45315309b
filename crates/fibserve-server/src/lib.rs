//! fibserve server library entry.
//!
//! Wires config, logging, metrics, the Fibonacci handler and ops routes into
//! the two-listener HTTP service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
