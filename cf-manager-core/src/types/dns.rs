//! DNS 记录与区域文件相关类型

use std::fmt;

use cf_manager_provider::{DnsRecord, DnsRecordPayload};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// TTL sentinel meaning "automatic"
pub const TTL_AUTOMATIC: u32 = 1;

/// DNS record type; unknown types are carried verbatim (upper-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ns,
    Srv,
    Caa,
    Soa,
    Uri,
    Other(String),
}

impl RecordType {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "NS" => Self::Ns,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            "SOA" => Self::Soa,
            "URI" => Self::Uri,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Soa => "SOA",
            Self::Uri => "URI",
            Self::Other(s) => s,
        }
    }

    /// Types whose upstream representation keeps `priority` outside `content`.
    pub fn has_priority(&self) -> bool {
        matches!(self, Self::Mx | Self::Srv | Self::Uri)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A DNS record in zone-file terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Owner name; `@` is the zone apex
    pub name: String,
    pub content: String,
    /// 1 means automatic
    pub ttl: u32,
    pub proxied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl ZoneRecord {
    pub fn to_payload(&self) -> DnsRecordPayload {
        DnsRecordPayload {
            record_type: self.record_type.to_string(),
            name: self.name.clone(),
            content: self.content.clone(),
            ttl: self.ttl,
            proxied: self.proxied,
            priority: self.priority,
        }
    }
}

impl From<&DnsRecord> for ZoneRecord {
    fn from(record: &DnsRecord) -> Self {
        Self {
            record_type: RecordType::parse(&record.record_type),
            name: record.name.clone(),
            content: record.content.clone(),
            ttl: record.ttl,
            proxied: record.proxied.unwrap_or(false),
            priority: record.priority,
        }
    }
}

/// 创建/更新 DNS 记录请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordRequest {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub proxied: Option<bool>,
    #[serde(default)]
    pub priority: Option<u16>,
}

impl RecordRequest {
    /// Checks required fields and applies defaults (ttl automatic, not proxied).
    pub fn validate(&self) -> CoreResult<DnsRecordPayload> {
        for (field, value) in [
            ("type", &self.record_type),
            ("name", &self.name),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::ValidationError(format!(
                    "record {field} must not be empty"
                )));
            }
        }

        Ok(DnsRecordPayload {
            record_type: self.record_type.trim().to_ascii_uppercase(),
            name: self.name.trim().to_string(),
            content: self.content.trim().to_string(),
            ttl: self.ttl.unwrap_or(TTL_AUTOMATIC),
            proxied: self.proxied.unwrap_or(false),
            priority: self.priority,
        })
    }
}

/// 区域导出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    #[default]
    #[serde(alias = "zonefile")]
    Bind,
}

/// Downloadable zone file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFileDownload {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

/// 区域导出结果
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ZoneExport {
    Records(Vec<DnsRecord>),
    ZoneFile(ZoneFileDownload),
}
