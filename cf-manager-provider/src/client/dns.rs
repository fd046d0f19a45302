//! DNS zones & records endpoints

use reqwest::Method;

use crate::error::Result;
use crate::traits::ErrorContext;
use crate::types::{AggregatedResult, DnsRecord, DnsRecordPayload, Zone};

use super::http::Body;
use super::{CloudflareClient, PAGE_SIZE_DEFAULT, PAGE_SIZE_RECORDS};

impl CloudflareClient {
    pub async fn list_zones(&self) -> Result<AggregatedResult<Zone>> {
        self.get_all_pages("/zones", PAGE_SIZE_DEFAULT, &ErrorContext::resource("zones"))
            .await
    }

    pub async fn list_dns_records(&self, zone_id: &str) -> Result<AggregatedResult<DnsRecord>> {
        self.get_all_pages(
            &format!("/zones/{zone_id}/dns_records"),
            PAGE_SIZE_RECORDS,
            &ErrorContext::resource(format!("zone '{zone_id}'")),
        )
        .await
    }

    pub async fn create_dns_record(
        &self,
        zone_id: &str,
        record: &DnsRecordPayload,
    ) -> Result<DnsRecord> {
        self.write(
            Method::POST,
            &format!("/zones/{zone_id}/dns_records"),
            Body::json(record)?,
            &ErrorContext::resource(format!("dns record '{}'", record.name)),
        )
        .await
    }

    /// 全量更新（PUT）
    pub async fn update_dns_record(
        &self,
        zone_id: &str,
        record_id: &str,
        record: &DnsRecordPayload,
    ) -> Result<DnsRecord> {
        self.write(
            Method::PUT,
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            Body::json(record)?,
            &ErrorContext::resource(format!("dns record '{record_id}'")),
        )
        .await
    }

    pub async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        self.write_unit(
            Method::DELETE,
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            Body::Empty,
            &ErrorContext::resource(format!("dns record '{record_id}'")),
        )
        .await
    }
}
