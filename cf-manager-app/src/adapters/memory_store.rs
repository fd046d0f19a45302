//! 进程内凭证存储

use std::collections::HashMap;

use async_trait::async_trait;
use cf_manager_core::error::CoreResult;
use cf_manager_core::traits::CredentialStore;
use cf_manager_core::types::Credential;
use tokio::sync::RwLock;

/// Credentials held in memory for the lifetime of the process.
///
/// Secrets are kept exactly as the vault produced them; this store never
/// sees plaintext tokens.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_map(credentials: HashMap<String, Credential>) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }

    pub(crate) async fn snapshot(&self) -> Vec<Credential> {
        ordered(self.credentials.read().await.values())
    }

    pub(crate) async fn to_map(&self) -> HashMap<String, Credential> {
        self.credentials.read().await.clone()
    }

    pub(crate) async fn replace(&self, credentials: HashMap<String, Credential>) {
        *self.credentials.write().await = credentials;
    }
}

/// 按创建时间（同时间按 id）排序
pub(crate) fn ordered<'a>(credentials: impl Iterator<Item = &'a Credential>) -> Vec<Credential> {
    let mut all: Vec<Credential> = credentials.cloned().collect();
    all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    all
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find(&self, user_id: &str, credential_id: &str) -> CoreResult<Option<Credential>> {
        Ok(self
            .credentials
            .read()
            .await
            .get(credential_id)
            .filter(|c| c.owner_user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Credential>> {
        Ok(self
            .snapshot()
            .await
            .into_iter()
            .filter(|c| c.owner_user_id == user_id)
            .collect())
    }

    async fn save(&self, credential: &Credential) -> CoreResult<()> {
        self.credentials
            .write()
            .await
            .insert(credential.id.clone(), credential.clone());
        Ok(())
    }

    async fn delete(&self, credential_id: &str) -> CoreResult<()> {
        self.credentials.write().await.remove(credential_id);
        Ok(())
    }

    async fn set_provider_account_id(
        &self,
        credential_id: &str,
        provider_account_id: &str,
    ) -> CoreResult<()> {
        let mut store = self.credentials.write().await;
        if let Some(credential) = store.get_mut(credential_id) {
            // 已有值时不覆盖
            if credential.provider_account_id.is_none() {
                credential.provider_account_id = Some(provider_account_id.to_string());
            }
        }
        Ok(())
    }
}
