// ABOUTME: Shared HTTP client with connection pooling for external product database calls
// ABOUTME: Singleton with configurable timeouts plus HTTP status to AppError mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{AppError, AppResult, ErrorCode};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Identifies us to public databases that ask for a descriptive agent
const USER_AGENT: &str = concat!("tattvam/", env!("CARGO_PKG_VERSION"));

/// Configured timeout values for the shared client
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Global shared HTTP client with configured timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared HTTP client timeout configuration
///
/// Must be called once at startup before any source creates its client.
/// If not called, defaults are used (30s timeout, 10s connect timeout).
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_secs, connect_timeout_secs));
}

/// Get the shared HTTP client for source API calls
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = CLIENT_TIMEOUTS
            .get()
            .copied()
            .unwrap_or((DEFAULT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS));

        ClientBuilder::new()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Map a non-success status to the matching error code
#[must_use]
pub fn status_error(service: &str, status: StatusCode, body: &str) -> AppError {
    let code = match status.as_u16() {
        401 | 403 => ErrorCode::ExternalAuthFailed,
        402 | 429 => ErrorCode::ExternalRateLimited,
        500..=599 => ErrorCode::ExternalServiceUnavailable,
        _ => ErrorCode::ExternalServiceError,
    };
    AppError::new(code, format!("{service}: HTTP {status}: {body}"))
}

/// Decode a JSON body, treating 404 as "no such product"
///
/// # Errors
///
/// Returns an external service error for any other non-success status or a
/// body that does not match `T`.
pub async fn read_json_or_none<T: DeserializeOwned>(
    service: &str,
    response: Response,
) -> AppResult<Option<T>> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!(service = %service, "Source returned 404");
        return Ok(None);
    }

    let body = response.text().await.map_err(AppError::from)?;
    if !status.is_success() {
        return Err(status_error(service, status, &body));
    }

    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| AppError::external_service(service, format!("JSON parse error: {e}")))
}
