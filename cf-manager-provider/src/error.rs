use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ApiMessage;

/// Failure of a Cloudflare API call.
///
/// Well-known upstream codes map onto a dedicated variant; anything else
/// becomes [`Upstream`](Self::Upstream) carrying the envelope's `errors`
/// array as received.
///
/// `NetworkError` and `RateLimited` are transient (see
/// [`is_transient`](Self::is_transient)); the client replays them for
/// idempotent methods only. A `Timeout` is final: the upstream may have
/// applied the request already.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection failure or gateway status (502/503/504).
    NetworkError { detail: String },

    /// Connect or request timeout elapsed.
    Timeout { detail: String },

    /// HTTP 429 or upstream code 971.
    RateLimited {
        /// Seconds from the `Retry-After` header.
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    /// Token rejected (invalid, expired, malformed).
    InvalidCredentials { raw_message: Option<String> },

    /// Token accepted but not scoped for this call.
    PermissionDenied { raw_message: Option<String> },

    NotFound {
        /// e.g. `kv key 'foo'`
        resource: String,
        raw_message: Option<String>,
    },

    AlreadyExists {
        resource: String,
        raw_message: Option<String>,
    },

    /// Upstream validation failure; `param` is `general` when the code names no field.
    InvalidParameter { param: String, detail: String },

    QuotaExceeded { raw_message: Option<String> },

    /// Response body was not the expected JSON shape.
    ParseError { detail: String },

    /// Request body could not be encoded.
    SerializationError { detail: String },

    /// Unmapped failure with the upstream `errors` array preserved.
    Upstream {
        status: u16,
        errors: Vec<ApiMessage>,
    },
}

impl ProviderError {
    /// 调用方可预见的失败（输入错误、资源缺失）记 warn，其余记 error
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidCredentials { .. }
            | Self::PermissionDenied { .. }
            | Self::NotFound { .. }
            | Self::AlreadyExists { .. }
            | Self::InvalidParameter { .. }
            | Self::QuotaExceeded { .. } => true,
            Self::Upstream { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Whether retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::RateLimited { .. }
        )
    }
}

/// `label` 后附加上游原始消息（若有）
fn write_with_message(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    raw_message: Option<&String>,
) -> fmt::Result {
    match raw_message {
        Some(msg) => write!(f, "{label}: {msg}"),
        None => f.write_str(label),
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::RateLimited {
                retry_after: Some(secs),
                ..
            } => write!(f, "Rate limited (retry after {secs}s)"),
            Self::RateLimited { .. } => f.write_str("Rate limited"),
            Self::InvalidCredentials { raw_message } => {
                write_with_message(f, "Invalid credentials", raw_message.as_ref())
            }
            Self::PermissionDenied { raw_message } => {
                write_with_message(f, "Permission denied", raw_message.as_ref())
            }
            Self::NotFound {
                resource,
                raw_message,
            } => write_with_message(f, &format!("{resource} not found"), raw_message.as_ref()),
            Self::AlreadyExists { resource, .. } => write!(f, "{resource} already exists"),
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::QuotaExceeded { .. } => f.write_str("Quota exceeded"),
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::SerializationError { detail } => write!(f, "Serialization error: {detail}"),
            Self::Upstream { status, errors } if errors.is_empty() => {
                write!(f, "Upstream error (HTTP {status})")
            }
            Self::Upstream { status, errors } => {
                write!(f, "Upstream error (HTTP {status}): ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} ({})", e.message, e.code)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ProviderError {}

pub type Result<T> = std::result::Result<T, ProviderError>;
