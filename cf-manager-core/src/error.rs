//! Error type returned by every service operation

use serde::Serialize;
use thiserror::Error;

pub use cf_manager_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The caller owns no credential with this id
    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    /// Stored secret could not be authenticated or decrypted
    #[error("Failed to decrypt credential: {0}")]
    DecryptionError(String),

    /// Upstream rejected a token during registration
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Input rejected before any upstream call
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Credential store failure
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Upstream error (converting from library), payload preserved
    #[serde(rename = "UpstreamError")]
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Caller-caused failures log at `warn`; everything else at `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::CredentialNotFound(_) | Self::ValidationError(_) | Self::InvalidCredentials(_) => {
                true
            }
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Stable machine-readable code, identical to the serialized `code` tag.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CredentialNotFound(_) => "CredentialNotFound",
            Self::DecryptionError(_) => "DecryptionError",
            Self::InvalidCredentials(_) => "InvalidCredentials",
            Self::ValidationError(_) => "ValidationError",
            Self::StorageError(_) => "StorageError",
            Self::SerializationError(_) => "SerializationError",
            Self::ConfigError(_) => "ConfigError",
            Self::Provider(_) => "UpstreamError",
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cf_manager_provider::ApiMessage;

    #[test]
    fn serialized_code_matches_code_method() {
        let errors = [
            CoreError::CredentialNotFound("c1".into()),
            CoreError::DecryptionError("bad tag".into()),
            CoreError::ConfigError("missing key".into()),
            CoreError::Provider(ProviderError::Timeout {
                detail: "30s".into(),
            }),
        ];
        for err in errors {
            let value = serde_json::to_value(&err).unwrap();
            assert_eq!(value["code"], err.code());
        }
    }

    #[test]
    fn upstream_payload_is_preserved() {
        let err = CoreError::from(ProviderError::Upstream {
            status: 400,
            errors: vec![ApiMessage::new(1234, "first"), ApiMessage::new(5678, "second")],
        });
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "UpstreamError");
        assert_eq!(value["details"]["code"], "Upstream");
        assert_eq!(value["details"]["status"], 400);
        assert_eq!(value["details"]["errors"][1]["message"], "second");
    }

    #[test]
    fn expected_classification() {
        assert!(CoreError::CredentialNotFound("x".into()).is_expected());
        assert!(CoreError::ValidationError("x".into()).is_expected());
        assert!(!CoreError::DecryptionError("x".into()).is_expected());
        assert!(!CoreError::StorageError("x".into()).is_expected());
        assert!(CoreError::Provider(ProviderError::NotFound {
            resource: "kv key 'a'".into(),
            raw_message: None,
        })
        .is_expected());
        assert!(!CoreError::Provider(ProviderError::NetworkError {
            detail: "reset".into(),
        })
        .is_expected());
    }
}
