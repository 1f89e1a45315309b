//! Public HTTP API.
//!
//! - `GET /?n=<int>` : first `n` Fibonacci numbers as plain text

pub mod fib;
