//! Configuration, request models and the retry caller shared by every function

pub mod config;
pub mod models;
pub mod retry;

// Re-export main types for convenience
pub use retry::{Classify, Completion, FailureKind, RetryCaller, RetryError, RetryPolicy};

use std::time::Duration;

/// Timeout applied to every outbound request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared outbound HTTP client, built once per cold start.
#[must_use]
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
