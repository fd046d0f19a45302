//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cf_manager_provider::{CloudflareApi, ProviderError, Result as ProviderResult};
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::bulk::BulkRunner;
use crate::crypto::CredentialVault;
use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::{ClientFactory, CredentialStore};
use crate::types::{
    Account, AggregatedResult, Credential, D1Database, DnsRecord, DnsRecordPayload, KvKey,
    KvNamespace, Page, PagesDeployment, PagesProject, ScriptBinding, ScriptSettings,
    WorkerScript, Zone,
};

pub const TEST_USER: &str = "user-1";
pub const TEST_SECRET: &str = "test-encryption-key";

// ===== MockCredentialStore =====

pub struct MockCredentialStore {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(HashMap::new()),
        }
    }

    /// 破坏已存储的密文（模拟密钥轮换或数据损坏）
    pub async fn corrupt_secret(&self, credential_id: &str) {
        if let Some(credential) = self.credentials.write().await.get_mut(credential_id) {
            credential.encrypted_secret = "v1:AAAA".to_string();
        }
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
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
        let mut list: Vec<Credential> = self
            .credentials
            .read()
            .await
            .values()
            .filter(|c| c.owner_user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
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
            if credential.provider_account_id.is_none() {
                credential.provider_account_id = Some(provider_account_id.to_string());
            }
        }
        Ok(())
    }
}

// ===== MockCloudflareApi =====

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    accounts: Vec<String>,
    accounts_error: Option<ProviderError>,
    /// 注入失败的标识（KV 键、记录名或记录 ID）
    failing: HashSet<String>,
    scripts: HashMap<String, String>,
    bindings: Vec<ScriptBinding>,
    kv: BTreeMap<String, (Vec<u8>, Option<Value>)>,
    zones: Vec<String>,
    records: HashMap<String, Vec<DnsRecord>>,
    next_record: usize,
    deployment_body: Option<Value>,
}

/// In-memory upstream; every call is recorded as `method[:scope/target]`.
pub struct MockCloudflareApi {
    state: RwLock<MockState>,
    tokens: Mutex<Vec<String>>,
}

impl MockCloudflareApi {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState {
                accounts: vec!["acc-1".to_string()],
                ..MockState::default()
            }),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    /// Tokens the factory built clients for, in order.
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub async fn set_accounts(&self, ids: &[&str]) {
        self.state.write().await.accounts = ids.iter().map(|s| (*s).to_string()).collect();
    }

    pub async fn fail_accounts(&self, error: ProviderError) {
        self.state.write().await.accounts_error = Some(error);
    }

    pub async fn fail_on(&self, identifier: &str) {
        self.state
            .write()
            .await
            .failing
            .insert(identifier.to_string());
    }

    pub async fn last_bindings(&self) -> Vec<ScriptBinding> {
        self.state.read().await.bindings.clone()
    }

    pub async fn last_deployment_body(&self) -> Option<Value> {
        self.state.read().await.deployment_body.clone()
    }

    pub async fn set_zones(&self, ids: &[&str]) {
        self.state.write().await.zones = ids.iter().map(|s| (*s).to_string()).collect();
    }

    pub async fn put_kv(&self, key: &str, value: &[u8]) {
        self.state
            .write()
            .await
            .kv
            .insert(key.to_string(), (value.to_vec(), None));
    }

    pub async fn kv_get(&self, key: &str) -> Option<Vec<u8>> {
        self.state.read().await.kv.get(key).map(|(v, _)| v.clone())
    }

    pub async fn kv_metadata(&self, key: &str) -> Option<Value> {
        self.state
            .read()
            .await
            .kv
            .get(key)
            .and_then(|(_, m)| m.clone())
    }

    /// 当前存储的键（有序）
    pub async fn kv_keys(&self) -> Vec<String> {
        self.state.read().await.kv.keys().cloned().collect()
    }

    pub async fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.state
            .read()
            .await
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn record_call(&self, call: String) {
        self.state.write().await.calls.push(call);
    }

    async fn check_failure(&self, identifier: &str, resource: String) -> ProviderResult<()> {
        if self.state.read().await.failing.contains(identifier) {
            return Err(ProviderError::NotFound {
                resource,
                raw_message: Some("injected failure".to_string()),
            });
        }
        Ok(())
    }

    fn worker(name: &str) -> WorkerScript {
        WorkerScript {
            id: name.to_string(),
            created_on: None,
            modified_on: Some(Utc::now()),
            extra: Map::new(),
        }
    }
}

#[async_trait]
impl CloudflareApi for MockCloudflareApi {
    async fn list_accounts(&self) -> ProviderResult<AggregatedResult<Account>> {
        self.record_call("list_accounts".to_string()).await;
        let state = self.state.read().await;
        if let Some(err) = &state.accounts_error {
            return Err(err.clone());
        }
        Ok(AggregatedResult::complete(
            state
                .accounts
                .iter()
                .map(|id| Account {
                    id: id.clone(),
                    name: format!("Account {id}"),
                    extra: Map::new(),
                })
                .collect(),
        ))
    }

    async fn list_scripts(&self, account_id: &str) -> ProviderResult<AggregatedResult<WorkerScript>> {
        self.record_call(format!("list_scripts:{account_id}")).await;
        let mut names: Vec<String> = self.state.read().await.scripts.keys().cloned().collect();
        names.sort();
        Ok(AggregatedResult::complete(
            names.iter().map(|n| Self::worker(n)).collect(),
        ))
    }

    async fn get_script_content(&self, account_id: &str, script_name: &str) -> ProviderResult<String> {
        self.record_call(format!("get_script_content:{account_id}/{script_name}"))
            .await;
        self.state
            .read()
            .await
            .scripts
            .get(script_name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                resource: format!("script '{script_name}'"),
                raw_message: None,
            })
    }

    async fn upload_script(
        &self,
        account_id: &str,
        script_name: &str,
        content: &str,
    ) -> ProviderResult<WorkerScript> {
        self.record_call(format!("upload_script:{account_id}/{script_name}"))
            .await;
        self.state
            .write()
            .await
            .scripts
            .insert(script_name.to_string(), content.to_string());
        Ok(Self::worker(script_name))
    }

    async fn delete_script(&self, account_id: &str, script_name: &str) -> ProviderResult<()> {
        self.record_call(format!("delete_script:{account_id}/{script_name}"))
            .await;
        match self.state.write().await.scripts.remove(script_name) {
            Some(_) => Ok(()),
            None => Err(ProviderError::NotFound {
                resource: format!("script '{script_name}'"),
                raw_message: None,
            }),
        }
    }

    async fn get_script_settings(
        &self,
        account_id: &str,
        script_name: &str,
    ) -> ProviderResult<ScriptSettings> {
        self.record_call(format!("get_script_settings:{account_id}/{script_name}"))
            .await;
        let state = self.state.read().await;
        Ok(ScriptSettings {
            bindings: state
                .bindings
                .iter()
                .filter_map(|b| serde_json::to_value(b).ok())
                .collect(),
            ..ScriptSettings::default()
        })
    }

    async fn update_script_bindings(
        &self,
        account_id: &str,
        script_name: &str,
        bindings: &[ScriptBinding],
    ) -> ProviderResult<WorkerScript> {
        self.record_call(format!("update_script_bindings:{account_id}/{script_name}"))
            .await;
        self.state.write().await.bindings = bindings.to_vec();
        Ok(Self::worker(script_name))
    }

    async fn list_kv_namespaces(
        &self,
        account_id: &str,
    ) -> ProviderResult<AggregatedResult<KvNamespace>> {
        self.record_call(format!("list_kv_namespaces:{account_id}")).await;
        Ok(AggregatedResult::complete(Vec::new()))
    }

    async fn create_kv_namespace(&self, account_id: &str, title: &str) -> ProviderResult<KvNamespace> {
        self.record_call(format!("create_kv_namespace:{account_id}/{title}"))
            .await;
        Ok(KvNamespace {
            id: format!("ns-{title}"),
            title: title.to_string(),
            supports_url_encoding: Some(true),
            extra: Map::new(),
        })
    }

    async fn delete_kv_namespace(&self, account_id: &str, namespace_id: &str) -> ProviderResult<()> {
        self.record_call(format!("delete_kv_namespace:{account_id}/{namespace_id}"))
            .await;
        Ok(())
    }

    async fn list_kv_keys(
        &self,
        account_id: &str,
        namespace_id: &str,
        prefix: Option<&str>,
    ) -> ProviderResult<AggregatedResult<KvKey>> {
        self.record_call(format!("list_kv_keys:{account_id}/{namespace_id}"))
            .await;
        let state = self.state.read().await;
        Ok(AggregatedResult::complete(
            state
                .kv
                .iter()
                .filter(|(name, _)| prefix.is_none_or(|p| name.starts_with(p)))
                .map(|(name, (_, metadata))| KvKey {
                    name: name.clone(),
                    expiration: None,
                    metadata: metadata.clone(),
                })
                .collect(),
        ))
    }

    async fn get_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> ProviderResult<Vec<u8>> {
        self.record_call(format!("get_kv_value:{account_id}/{namespace_id}/{key}"))
            .await;
        self.check_failure(key, format!("kv key '{key}'")).await?;
        self.kv_get(key).await.ok_or_else(|| ProviderError::NotFound {
            resource: format!("kv key '{key}'"),
            raw_message: None,
        })
    }

    async fn put_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
        value: &str,
        metadata: Option<&Value>,
    ) -> ProviderResult<()> {
        self.record_call(format!("put_kv_value:{account_id}/{namespace_id}/{key}"))
            .await;
        self.check_failure(key, format!("kv namespace '{namespace_id}'"))
            .await?;
        self.state.write().await.kv.insert(
            key.to_string(),
            (value.as_bytes().to_vec(), metadata.cloned()),
        );
        Ok(())
    }

    async fn delete_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> ProviderResult<()> {
        self.record_call(format!("delete_kv_value:{account_id}/{namespace_id}/{key}"))
            .await;
        self.check_failure(key, format!("kv key '{key}'")).await?;
        // 上游删除不存在的键同样成功
        self.state.write().await.kv.remove(key);
        Ok(())
    }

    async fn list_d1_databases(
        &self,
        account_id: &str,
        page: u32,
        per_page: u32,
    ) -> ProviderResult<Page<D1Database>> {
        self.record_call(format!("list_d1_databases:{account_id}/{page}/{per_page}"))
            .await;
        Ok(Page {
            items: Vec::new(),
            result_info: None,
        })
    }

    async fn list_zones(&self) -> ProviderResult<AggregatedResult<Zone>> {
        self.record_call("list_zones".to_string()).await;
        let state = self.state.read().await;
        Ok(AggregatedResult::complete(
            state
                .zones
                .iter()
                .map(|id| Zone {
                    id: id.clone(),
                    name: format!("{id}.example.com"),
                    status: "active".to_string(),
                    extra: Map::new(),
                })
                .collect(),
        ))
    }

    async fn list_dns_records(&self, zone_id: &str) -> ProviderResult<AggregatedResult<DnsRecord>> {
        self.record_call(format!("list_dns_records:{zone_id}")).await;
        Ok(AggregatedResult::complete(self.records(zone_id).await))
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        record: &DnsRecordPayload,
    ) -> ProviderResult<DnsRecord> {
        self.record_call(format!("create_dns_record:{zone_id}/{}", record.name))
            .await;
        self.check_failure(&record.name, format!("dns record '{}'", record.name))
            .await?;

        let mut state = self.state.write().await;
        state.next_record += 1;
        let created = DnsRecord {
            id: format!("rec-{}", state.next_record),
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: record.content.clone(),
            ttl: record.ttl,
            proxied: Some(record.proxied),
            priority: record.priority,
            extra: Map::new(),
        };
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordPayload,
    ) -> ProviderResult<DnsRecord> {
        self.record_call(format!("update_dns_record:{zone_id}/{record_id}"))
            .await;
        let mut state = self.state.write().await;
        let existing = state
            .records
            .get_mut(zone_id)
            .and_then(|records| records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| ProviderError::NotFound {
                resource: format!("dns record '{record_id}'"),
                raw_message: None,
            })?;
        existing.record_type = record.record_type.clone();
        existing.name = record.name.clone();
        existing.content = record.content.clone();
        existing.ttl = record.ttl;
        existing.proxied = Some(record.proxied);
        existing.priority = record.priority;
        Ok(existing.clone())
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> ProviderResult<()> {
        self.record_call(format!("delete_dns_record:{zone_id}/{record_id}"))
            .await;
        self.check_failure(record_id, format!("dns record '{record_id}'"))
            .await?;
        let mut state = self.state.write().await;
        let records = state.records.entry(zone_id.to_string()).or_default();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(ProviderError::NotFound {
                resource: format!("dns record '{record_id}'"),
                raw_message: None,
            });
        }
        Ok(())
    }

    async fn list_pages_projects(&self, account_id: &str) -> ProviderResult<Vec<PagesProject>> {
        self.record_call(format!("list_pages_projects:{account_id}")).await;
        Ok(Vec::new())
    }

    async fn list_pages_deployments(
        &self,
        account_id: &str,
        project_name: &str,
    ) -> ProviderResult<Vec<PagesDeployment>> {
        self.record_call(format!("list_pages_deployments:{account_id}/{project_name}"))
            .await;
        Ok(Vec::new())
    }

    async fn create_pages_deployment(
        &self,
        account_id: &str,
        project_name: &str,
        body: &Value,
    ) -> ProviderResult<PagesDeployment> {
        self.record_call(format!("create_pages_deployment:{account_id}/{project_name}"))
            .await;
        self.state.write().await.deployment_body = Some(body.clone());
        Ok(PagesDeployment {
            id: "dep-1".to_string(),
            url: Some(format!("https://dep-1.{project_name}.pages.dev")),
            environment: Some("production".to_string()),
            extra: Map::new(),
        })
    }
}

// ===== MockClientFactory =====

/// Hands out the shared mock and remembers which tokens it was given.
pub struct MockClientFactory {
    api: Arc<MockCloudflareApi>,
}

impl ClientFactory for MockClientFactory {
    fn create(&self, api_token: &str) -> CoreResult<Arc<dyn CloudflareApi>> {
        self.api.tokens.lock().unwrap().push(api_token.to_string());
        Ok(self.api.clone())
    }
}

// ===== 工厂方法 =====

/// 创建测试用的 `ServiceContext`
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockCredentialStore>,
    Arc<MockCloudflareApi>,
) {
    create_test_context_with_runner(BulkRunner::default())
}

pub fn create_test_context_with_runner(
    bulk_runner: BulkRunner,
) -> (
    Arc<ServiceContext>,
    Arc<MockCredentialStore>,
    Arc<MockCloudflareApi>,
) {
    let store = Arc::new(MockCredentialStore::new());
    let api = Arc::new(MockCloudflareApi::new());
    // 测试中降低迭代次数
    let vault = Arc::new(CredentialVault::with_iterations(TEST_SECRET, 1_000).unwrap());
    let factory = Arc::new(MockClientFactory { api: api.clone() });

    let ctx = ServiceContext::new(store.clone(), vault, factory).with_bulk_runner(bulk_runner);
    (Arc::new(ctx), store, api)
}

/// 为 `TEST_USER` 写入一条凭证，明文 token 为 `token-<id>`
pub async fn seed_credential(
    ctx: &ServiceContext,
    store: &MockCredentialStore,
    credential_id: &str,
    provider_account_id: Option<&str>,
) {
    let encrypted_secret = ctx
        .vault
        .encrypt(&format!("token-{credential_id}"))
        .unwrap();
    store
        .save(&Credential {
            id: credential_id.to_string(),
            owner_user_id: TEST_USER.to_string(),
            account_name: format!("Account {credential_id}"),
            encrypted_secret,
            provider_account_id: provider_account_id.map(str::to_string),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
}
