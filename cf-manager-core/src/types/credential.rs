//! 凭证相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored upstream credential ("logical account").
///
/// `encrypted_secret` is vault ciphertext and never leaves the core in
/// plaintext; listings go through [`CredentialSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub owner_user_id: String,
    pub account_name: String,
    pub encrypted_secret: String,
    /// Upstream account id, backfilled once and never changed afterwards
    pub provider_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a credential without the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub id: String,
    pub account_name: String,
    pub provider_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Credential> for CredentialSummary {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id.clone(),
            account_name: credential.account_name.clone(),
            provider_account_id: credential.provider_account_id.clone(),
            created_at: credential.created_at,
        }
    }
}

/// 注册凭证请求
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCredentialRequest {
    pub account_name: String,
    pub api_token: String,
}

impl std::fmt::Debug for RegisterCredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCredentialRequest")
            .field("account_name", &self.account_name)
            .field("api_token", &"****")
            .finish()
    }
}
