//! Workers KV 相关类型

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A KV value as presented to callers.
///
/// The client hands back raw bytes; JSON-looking text is parsed here,
/// other text is passed through and non-UTF-8 payloads are base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum KvValue {
    Json(Value),
    Text(String),
    Binary(String),
}

impl KvValue {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => Self::Json(value),
                Err(_) => Self::Text(text),
            },
            Err(e) => Self::Binary(BASE64.encode(e.into_bytes())),
        }
    }
}

/// 写入 KV 值请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutValueRequest {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// 键值对（批量导入 / 命名空间导出）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}
