//! Request execution
//!
//! Sending, transport error classification and retries shared by every
//! endpoint family. Only status codes and raw bytes leave this module;
//! envelope decoding lives in `client::http`, which keeps raw-value
//! endpoints (script source, KV values) byte-exact.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Method, RequestBuilder};

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::body_for_log;

/// Upper bound for a server supplied `Retry-After`
const MAX_RETRY_AFTER_SECS: u64 = 30;
const BACKOFF_BASE_MS: u64 = 100;
const BACKOFF_CAP_MS: u64 = 10_000;

/// Status code and undecoded body of a completed exchange.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// When and how long to wait before replaying a failed request.
///
/// Only transient errors ([`ProviderError::is_transient`]) of idempotent
/// methods are replayed: a POST that timed out may already have been
/// applied upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    fn applies_to(self, method: &Method) -> bool {
        self.max_retries > 0
            && matches!(
                *method,
                Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
            )
    }

    /// `Retry-After` wins when present, otherwise 100ms doubling per attempt up to 10s.
    fn delay(self, error: &ProviderError, attempt: u32) -> Duration {
        match error {
            ProviderError::RateLimited {
                retry_after: Some(secs),
                ..
            } => Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS)),
            _ => {
                let factor = 1_u64 << attempt.min(20);
                Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_CAP_MS))
            }
        }
    }
}

/// Sends one request.
///
/// HTTP 429 becomes `RateLimited`, 502-504 `NetworkError`; every other
/// status is returned to the caller untouched.
pub(crate) async fn send_once(
    request: RequestBuilder,
    provider: &str,
    method: &Method,
    url: &str,
) -> Result<RawResponse> {
    log::debug!("[{provider}] {method} {url}");

    let response = request
        .send()
        .await
        .map_err(|e| transport_error(&e, "request failed"))?;
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(&e, "failed to read response body"))?
        .to_vec();
    log::debug!("[{provider}] {status} {}", body_for_log(&body));

    if let Some(err) = status_failure(status, retry_after, &body) {
        log::warn!("[{provider}] {method} {url}: {err}");
        return Err(err);
    }
    Ok(RawResponse { status, body })
}

/// Sends a request, replaying it under `policy`.
///
/// Requests whose body cannot be cloned (multipart streams) go out once.
pub(crate) async fn send_with_retry(
    request: RequestBuilder,
    provider: &str,
    method: &Method,
    url: &str,
    policy: RetryPolicy,
) -> Result<RawResponse> {
    if !policy.applies_to(method) {
        return send_once(request, provider, method, url).await;
    }

    let mut attempt = 0;
    loop {
        let Some(replay) = request.try_clone() else {
            log::debug!("[{provider}] request body is not cloneable, sending once");
            return send_once(request, provider, method, url).await;
        };

        match send_once(replay, provider, method, url).await {
            Err(err) if attempt < policy.max_retries && err.is_transient() => {
                let delay = policy.delay(&err, attempt);
                attempt += 1;
                log::warn!(
                    "[{provider}] retry {attempt}/{} in {}ms after: {err}",
                    policy.max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            outcome => return outcome,
        }
    }
}

fn transport_error(error: &reqwest::Error, what: &str) -> ProviderError {
    let detail = format!("{what}: {error}");
    if error.is_timeout() {
        ProviderError::Timeout { detail }
    } else {
        ProviderError::NetworkError { detail }
    }
}

/// Statuses handled before envelope decoding.
fn status_failure(status: u16, retry_after: Option<u64>, body: &[u8]) -> Option<ProviderError> {
    match status {
        429 => Some(ProviderError::RateLimited {
            retry_after,
            raw_message: Some(body_for_log(body)),
        }),
        502..=504 => Some(ProviderError::NetworkError {
            detail: format!("HTTP {status}: {}", body_for_log(body)),
        }),
        _ => None,
    }
}
