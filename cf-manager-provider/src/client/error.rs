//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::ApiMessage;
use crate::utils::log_sanitizer::truncate_for_log;

use super::CloudflareClient;

/// Cloudflare error code mapping
/// Reference: <https://developers.cloudflare.com/fundamentals/api/troubleshooting/>
impl ProviderErrorMapper for CloudflareClient {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError {
        let Some(code) = raw.code() else {
            return self.upstream_error(raw);
        };

        match code {
            // Authentication error
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6111: Invalid format for Authorization header
            // 9106: Missing X-Auth-Key, X-Auth-Email or Authorization headers
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            // 10001: Unable to authenticate request
            6003 | 6103 | 6111 | 9106 | 9109 | 10000 | 10001 => {
                ProviderError::InvalidCredentials {
                    raw_message: raw.message(),
                }
            }

            // 9103: Unknown X-Auth-Key or X-Auth-Email
            // 10005: Not authorized for this resource
            9103 | 10005 => ProviderError::PermissionDenied {
                raw_message: raw.message(),
            },

            // Invalid parameter
            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9005: Content for A record is invalid
            // 9006: Content for AAAA record is invalid
            // 9009: Content for MX record must be a hostname
            // 9021: Invalid TTL
            // 9041: This DNS record cannot be proxied
            // 10021: Script validation failed (syntax error, missing handler)
            1004 | 9000 | 9005 | 9006 | 9009 | 9021 | 9041 | 10021 => {
                let param = match code {
                    9000 => "name",
                    9005 | 9006 | 9009 => "content",
                    9021 => "ttl",
                    9041 => "proxied",
                    10021 => "script",
                    // 1004 is a general validation error.
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    param: param.to_string(),
                    detail: raw.message().unwrap_or_default(),
                }
            }

            // Already exists
            // 81053-81058: DNS record conflicts
            // 10014: A namespace with this title already exists
            81053..=81058 | 10014 => ProviderError::AlreadyExists {
                resource: context.describe(),
                raw_message: raw.message(),
            },

            // Not found
            // 81044: Record does not exist
            // 7000: No route for that URI
            // 7003: Could not route, object identifier is invalid
            // 10007: Workers script not found
            // 10009: KV key not found
            // 10013: KV namespace not found
            81044 | 7000 | 7003 | 10007 | 10009 | 10013 => ProviderError::NotFound {
                resource: context.describe(),
                raw_message: raw.message(),
            },

            // 81045: The record quota has been exceeded
            81045 => ProviderError::QuotaExceeded {
                raw_message: raw.message(),
            },

            // 971: Please wait and consider throttling your request speed
            971 => ProviderError::RateLimited {
                retry_after: None,
                raw_message: raw.message(),
            },

            _ => self.upstream_error(raw),
        }
    }
}

impl CloudflareClient {
    /// 响应体不是信封（或信封中无错误）时按 HTTP 状态码映射
    pub(crate) fn status_error(
        &self,
        status: u16,
        body: &[u8],
        context: &ErrorContext,
    ) -> ProviderError {
        let text = truncate_for_log(String::from_utf8_lossy(body).trim());
        let raw_message = (!text.is_empty()).then(|| text.clone());

        match status {
            401 => ProviderError::InvalidCredentials { raw_message },
            403 => ProviderError::PermissionDenied { raw_message },
            404 => ProviderError::NotFound {
                resource: context.describe(),
                raw_message,
            },
            _ => ProviderError::Upstream {
                status,
                errors: vec![ApiMessage::new(i64::from(status), text)],
            },
        }
    }
}
