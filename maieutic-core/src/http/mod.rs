//! HTTP layer for calls to generation backends
//!
//! One shared reqwest client with connection pooling, plus the mapping from
//! raw HTTP failures into the closed provider error taxonomy. Adapters own
//! the wire shapes; this layer only moves JSON and classifies status codes.

pub mod client;
pub mod error;

pub use client::HttpClient;

/// Per-request timeout applied to every backend call, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
