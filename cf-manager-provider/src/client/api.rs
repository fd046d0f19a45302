//! `CloudflareApi` implementation for the HTTP client

use async_trait::async_trait;
use serde_json::Value;

use crate::bindings::ScriptBinding;
use crate::error::Result;
use crate::traits::CloudflareApi;
use crate::types::{
    Account, AggregatedResult, D1Database, DnsRecord, DnsRecordPayload, KvKey, KvNamespace, Page,
    PagesDeployment, PagesProject, ScriptSettings, WorkerScript, Zone,
};

use super::CloudflareClient;

#[async_trait]
impl CloudflareApi for CloudflareClient {
    async fn list_accounts(&self) -> Result<AggregatedResult<Account>> {
        CloudflareClient::list_accounts(self).await
    }

    async fn list_scripts(&self, account_id: &str) -> Result<AggregatedResult<WorkerScript>> {
        CloudflareClient::list_scripts(self, account_id).await
    }

    async fn get_script_content(&self, account_id: &str, script_name: &str) -> Result<String> {
        CloudflareClient::get_script_content(self, account_id, script_name).await
    }

    async fn upload_script(
        &self,
        account_id: &str,
        script_name: &str,
        content: &str,
    ) -> Result<WorkerScript> {
        CloudflareClient::upload_script(self, account_id, script_name, content).await
    }

    async fn delete_script(&self, account_id: &str, script_name: &str) -> Result<()> {
        CloudflareClient::delete_script(self, account_id, script_name).await
    }

    async fn get_script_settings(
        &self,
        account_id: &str,
        script_name: &str,
    ) -> Result<ScriptSettings> {
        CloudflareClient::get_script_settings(self, account_id, script_name).await
    }

    async fn update_script_bindings(
        &self,
        account_id: &str,
        script_name: &str,
        bindings: &[ScriptBinding],
    ) -> Result<WorkerScript> {
        CloudflareClient::update_script_bindings(self, account_id, script_name, bindings).await
    }

    async fn list_kv_namespaces(&self, account_id: &str) -> Result<AggregatedResult<KvNamespace>> {
        CloudflareClient::list_kv_namespaces(self, account_id).await
    }

    async fn create_kv_namespace(&self, account_id: &str, title: &str) -> Result<KvNamespace> {
        CloudflareClient::create_kv_namespace(self, account_id, title).await
    }

    async fn delete_kv_namespace(&self, account_id: &str, namespace_id: &str) -> Result<()> {
        CloudflareClient::delete_kv_namespace(self, account_id, namespace_id).await
    }

    async fn list_kv_keys(
        &self,
        account_id: &str,
        namespace_id: &str,
        prefix: Option<&str>,
    ) -> Result<AggregatedResult<KvKey>> {
        CloudflareClient::list_kv_keys(self, account_id, namespace_id, prefix).await
    }

    async fn get_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<Vec<u8>> {
        CloudflareClient::get_kv_value(self, account_id, namespace_id, key).await
    }

    async fn put_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
        value: &str,
        metadata: Option<&Value>,
    ) -> Result<()> {
        CloudflareClient::put_kv_value(self, account_id, namespace_id, key, value, metadata).await
    }

    async fn delete_kv_value(
        &self,
        account_id: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<()> {
        CloudflareClient::delete_kv_value(self, account_id, namespace_id, key).await
    }

    async fn list_d1_databases(
        &self,
        account_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<D1Database>> {
        CloudflareClient::list_d1_databases(self, account_id, page, per_page).await
    }

    async fn list_zones(&self) -> Result<AggregatedResult<Zone>> {
        CloudflareClient::list_zones(self).await
    }

    async fn list_dns_records(&self, zone_id: &str) -> Result<AggregatedResult<DnsRecord>> {
        CloudflareClient::list_dns_records(self, zone_id).await
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        record: &DnsRecordPayload,
    ) -> Result<DnsRecord> {
        CloudflareClient::create_dns_record(self, zone_id, record).await
    }

    async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordPayload,
    ) -> Result<DnsRecord> {
        CloudflareClient::update_dns_record(self, zone_id, record_id, record).await
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        CloudflareClient::delete_dns_record(self, zone_id, record_id).await
    }

    async fn list_pages_projects(&self, account_id: &str) -> Result<Vec<PagesProject>> {
        CloudflareClient::list_pages_projects(self, account_id).await
    }

    async fn list_pages_deployments(
        &self,
        account_id: &str,
        project_name: &str,
    ) -> Result<Vec<PagesDeployment>> {
        CloudflareClient::list_pages_deployments(self, account_id, project_name).await
    }

    async fn create_pages_deployment(
        &self,
        account_id: &str,
        project_name: &str,
        body: &Value,
    ) -> Result<PagesDeployment> {
        CloudflareClient::create_pages_deployment(self, account_id, project_name, body).await
    }
}
