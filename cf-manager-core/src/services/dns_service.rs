//! DNS 管理服务

use std::sync::Arc;

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::services::{require_non_empty, ServiceContext};
use crate::types::{
    AggregatedResult, BulkOutcome, DnsRecord, ExportFormat, RecordRequest, Zone, ZoneExport,
    ZoneFileDownload, ZoneRecord,
};
use crate::zone_file::{
    decode_upload, export_filename, parse_zone_file, write_zone_file, ZONE_FILE_CONTENT_TYPE,
};

/// DNS 管理服务
///
/// Zones and records are addressed by zone id only, so these operations do
/// not need the upstream account id.
pub struct DnsService {
    ctx: Arc<ServiceContext>,
}

impl DnsService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn list_zones(
        &self,
        user_id: &str,
        credential_id: &str,
    ) -> CoreResult<AggregatedResult<Zone>> {
        let client = self.ctx.client(user_id, credential_id).await?;
        client
            .list_zones()
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn list_records(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
    ) -> CoreResult<AggregatedResult<DnsRecord>> {
        require_non_empty("zone id", zone_id)?;
        let client = self.ctx.client(user_id, credential_id).await?;
        client
            .list_dns_records(zone_id)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn create_record(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
        request: &RecordRequest,
    ) -> CoreResult<DnsRecord> {
        let payload = request.validate()?;
        let client = self.ctx.client(user_id, credential_id).await?;
        client
            .create_dns_record(zone_id, &payload)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn update_record(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> CoreResult<DnsRecord> {
        require_non_empty("record id", record_id)?;
        let payload = request.validate()?;
        let client = self.ctx.client(user_id, credential_id).await?;
        client
            .update_dns_record(zone_id, record_id, &payload)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    pub async fn delete_record(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
        record_id: &str,
    ) -> CoreResult<()> {
        require_non_empty("record id", record_id)?;
        let client = self.ctx.client(user_id, credential_id).await?;
        client
            .delete_dns_record(zone_id, record_id)
            .await
            .map_err(|e| self.ctx.handle_provider_error(credential_id, e))
    }

    /// 批量删除记录，单个失败不影响其余
    pub async fn bulk_delete_records(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
        record_ids: Vec<String>,
    ) -> CoreResult<BulkOutcome> {
        if record_ids.is_empty() {
            return Err(CoreError::ValidationError(
                "record ids to delete must not be empty".to_string(),
            ));
        }

        let client = self.ctx.client(user_id, credential_id).await?;
        let client = &client;
        Ok(self
            .ctx
            .bulk_runner
            .run(record_ids, |id: &String| id.clone(), |id| async move {
                client.delete_dns_record(zone_id, &id).await
            })
            .await)
    }

    /// Exports every record of a zone, as JSON records or as a zone file.
    pub async fn export_zone(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
        format: ExportFormat,
    ) -> CoreResult<ZoneExport> {
        let records = self.list_records(user_id, credential_id, zone_id).await?;

        match format {
            ExportFormat::Json => Ok(ZoneExport::Records(records.items)),
            ExportFormat::Bind => {
                let zone_records: Vec<ZoneRecord> =
                    records.items.iter().map(ZoneRecord::from).collect();
                let content = write_zone_file(zone_id, &zone_records, Utc::now());
                log::info!(
                    "Exported {} records of zone {zone_id} as zone file",
                    zone_records.len()
                );
                Ok(ZoneExport::ZoneFile(ZoneFileDownload {
                    filename: export_filename(zone_id),
                    content_type: ZONE_FILE_CONTENT_TYPE.to_string(),
                    content,
                }))
            }
        }
    }

    /// Imports an uploaded zone file.
    ///
    /// Every parsed record is created separately; skipped lines are logged
    /// and do not count towards the outcome.
    pub async fn import_zone_file(
        &self,
        user_id: &str,
        credential_id: &str,
        zone_id: &str,
        upload: &[u8],
    ) -> CoreResult<BulkOutcome> {
        require_non_empty("zone id", zone_id)?;
        let text = decode_upload(upload)?;
        let parsed = parse_zone_file(text);
        for skipped in &parsed.skipped {
            log::warn!(
                "Zone file for {zone_id}: line {} skipped ({})",
                skipped.line_number,
                skipped.reason
            );
        }

        let client = self.ctx.client(user_id, credential_id).await?;
        let client = &client;
        Ok(self
            .ctx
            .bulk_runner
            .run(
                parsed.records,
                |record: &ZoneRecord| record.name.clone(),
                |record| async move {
                    client
                        .create_dns_record(zone_id, &record.to_payload())
                        .await
                },
            )
            .await)
    }
}
