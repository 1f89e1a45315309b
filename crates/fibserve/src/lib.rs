//! Top-level facade crate for fibserve.
//!
//! Re-exports the sequence core and the HTTP server so users can depend on a single crate.

pub mod core {
    pub use fibserve_core::*;
}

pub mod server {
    pub use fibserve_server::*;
}
