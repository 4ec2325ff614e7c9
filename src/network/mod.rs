//! HTTP networking module
//!
//! Provides the JSON-over-HTTP client used by the search and chat providers.

mod client;

pub use client::{ApiRequest, ApiResponse, HttpClient};
