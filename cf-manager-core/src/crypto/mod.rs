//! Credential vault
//!
//! Encrypts upstream API tokens at rest with AES-256-GCM. The key is derived
//! once from the configured secret, so a vault lives as long as the process
//! configuration does. Ciphertexts are authenticated: anything not produced
//! by [`CredentialVault::encrypt`] under the same secret is rejected instead
//! of decrypting to garbage.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CoreError, CoreResult};

/// 密文格式版本前缀
const CIPHERTEXT_PREFIX: &str = "v1:";
const PBKDF2_ITERATIONS: u32 = 100_000;
/// 固定盐：同一密钥在重启后必须派生出同一加密密钥
const KEY_SALT: &[u8] = b"cf-manager/credential-vault/v1";
const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32; // AES-256

/// Symmetric encrypt/decrypt pair for stored credential secrets.
///
/// Output format: `v1:` followed by base64(nonce ‖ ciphertext ‖ tag), with a
/// fresh random nonce per call. The empty string maps to itself in both
/// directions.
pub struct CredentialVault {
    cipher: Aes256Gcm,
}

impl CredentialVault {
    /// Builds a vault from the process-wide secret.
    ///
    /// There is no fallback secret: an empty one is a configuration error.
    pub fn new(secret: &str) -> CoreResult<Self> {
        Self::with_iterations(secret, PBKDF2_ITERATIONS)
    }

    pub(crate) fn with_iterations(secret: &str, iterations: u32) -> CoreResult<Self> {
        if secret.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "encryption key must not be empty".to_string(),
            ));
        }

        let key = pbkdf2_hmac_array::<Sha256, KEY_LENGTH>(secret.as_bytes(), KEY_SALT, iterations);
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CoreError::ConfigError(format!("Failed to create cipher: {e}")))?;

        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> CoreResult<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        rand::rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| CoreError::SerializationError(format!("Encryption failed: {e}")))?;

        let mut payload = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);

        Ok(format!("{CIPHERTEXT_PREFIX}{}", BASE64.encode(payload)))
    }

    pub fn decrypt(&self, ciphertext: &str) -> CoreResult<String> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }

        let encoded = ciphertext
            .strip_prefix(CIPHERTEXT_PREFIX)
            .ok_or_else(|| CoreError::DecryptionError("unrecognised ciphertext format".into()))?;
        let payload = BASE64
            .decode(encoded)
            .map_err(|e| CoreError::DecryptionError(format!("invalid base64: {e}")))?;
        if payload.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(CoreError::DecryptionError("ciphertext too short".into()));
        }

        let (nonce_bytes, sealed) = payload.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| {
                CoreError::DecryptionError(
                    "authentication failed: wrong key or corrupted data".to_string(),
                )
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| CoreError::DecryptionError(format!("plaintext is not UTF-8: {e}")))
    }
}

impl fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVault").finish_non_exhaustive()
    }
}
