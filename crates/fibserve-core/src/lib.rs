//! fibserve core: the bounded Fibonacci sequence generator and the error
//! surface shared with the HTTP server.
//!
//! This crate carries no transport or runtime dependencies so the generator
//! can be reused and tested on its own.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `FibServeError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod sequence;

/// Shared result type.
pub use error::{ErrorCode, FibServeError, Result};
pub use sequence::{generate, Sequence, SequenceRequest, MAX_COUNT};
