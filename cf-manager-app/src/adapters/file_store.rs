//! JSON 文件凭证存储
//!
//! The whole credential list is rewritten on every change: written to a
//! sibling temp file first, then renamed over the target. Changes are
//! applied to a staged copy and only become visible once the file write
//! succeeded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cf_manager_core::error::{CoreError, CoreResult};
use cf_manager_core::traits::CredentialStore;
use cf_manager_core::types::Credential;
use tokio::sync::Mutex;

use super::memory_store::{InMemoryCredentialStore, ordered};

/// Credential store persisted to a single JSON file.
///
/// The file only ever contains vault ciphertexts.
pub struct JsonFileCredentialStore {
    path: PathBuf,
    inner: InMemoryCredentialStore,
    /// 串行化写文件
    write_lock: Mutex<()>,
}

impl JsonFileCredentialStore {
    /// Opens the store, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let credentials = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse(&contents, &path)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Credential file {} not found, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        log::debug!("Loaded {} credentials from {}", credentials.len(), path.display());
        Ok(Self {
            path,
            inner: InMemoryCredentialStore::from_map(credentials),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 在副本上应用变更，落盘成功后才替换内存状态
    async fn commit<F>(&self, change: F) -> CoreResult<()>
    where
        F: FnOnce(&mut HashMap<String, Credential>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut staged = self.inner.to_map().await;
        change(&mut staged);
        self.write_file(&ordered(staged.values())).await?;
        self.inner.replace(staged).await;
        Ok(())
    }

    async fn write_file(&self, credentials: &[Credential]) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(credentials)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to replace {}: {e}", self.path.display()))
        })
    }
}

fn parse(contents: &str, path: &Path) -> CoreResult<HashMap<String, Credential>> {
    if contents.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let list: Vec<Credential> = serde_json::from_str(contents).map_err(|e| {
        CoreError::SerializationError(format!("Invalid credential file {}: {e}", path.display()))
    })?;
    Ok(list.into_iter().map(|c| (c.id.clone(), c)).collect())
}

#[async_trait]
impl CredentialStore for JsonFileCredentialStore {
    async fn find(&self, user_id: &str, credential_id: &str) -> CoreResult<Option<Credential>> {
        self.inner.find(user_id, credential_id).await
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Credential>> {
        self.inner.list_by_user(user_id).await
    }

    async fn save(&self, credential: &Credential) -> CoreResult<()> {
        self.commit(|all| {
            all.insert(credential.id.clone(), credential.clone());
        })
        .await
    }

    async fn delete(&self, credential_id: &str) -> CoreResult<()> {
        self.commit(|all| {
            all.remove(credential_id);
        })
        .await
    }

    async fn set_provider_account_id(
        &self,
        credential_id: &str,
        provider_account_id: &str,
    ) -> CoreResult<()> {
        self.commit(|all| {
            if let Some(credential) = all.get_mut(credential_id) {
                // 已有值时不覆盖
                if credential.provider_account_id.is_none() {
                    credential.provider_account_id = Some(provider_account_id.to_string());
                }
            }
        })
        .await
    }
}
