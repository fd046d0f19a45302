//! Workers script binding model and upload metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ScriptSettings;

/// File name of the script part in every multipart upload.
pub const SCRIPT_PART_NAME: &str = "index.js";

/// A resource binding attached to a Workers script.
///
/// Serializes to the exact discriminators the upstream expects, e.g. a D1
/// binding is `{"type":"d1","name":..,"id":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScriptBinding {
    /// Plain text environment variable.
    #[serde(rename = "plain_text")]
    PlainText { name: String, text: String },

    /// Reference to a Workers KV namespace.
    #[serde(rename = "kv_namespace")]
    KvNamespace { name: String, namespace_id: String },

    /// Reference to a D1 database.
    #[serde(rename = "d1")]
    D1Database {
        name: String,
        #[serde(rename = "id")]
        database_id: String,
    },
}

impl ScriptBinding {
    /// Variable name the binding is exposed under inside the script.
    pub fn name(&self) -> &str {
        match self {
            Self::PlainText { name, .. }
            | Self::KvNamespace { name, .. }
            | Self::D1Database { name, .. } => name,
        }
    }

    /// Upstream discriminator string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlainText { .. } => "plain_text",
            Self::KvNamespace { .. } => "kv_namespace",
            Self::D1Database { .. } => "d1",
        }
    }

    /// Interprets a binding object as stored upstream or by older clients.
    ///
    /// An explicit `type` wins. Without one the kind is inferred from the
    /// fields present: `namespace_id` means KV, `database_id`/`id` means D1,
    /// `text` means plain text. Returns `None` for kinds not modelled here
    /// (durable objects, services, secrets...) or when a required field is missing.
    pub fn from_stored(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?.to_string();
        let field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        let database_id = || field("id").or_else(|| field("database_id"));

        match obj.get("type").and_then(Value::as_str) {
            Some("plain_text") => Some(Self::PlainText {
                name,
                text: field("text")?,
            }),
            Some("kv_namespace") => Some(Self::KvNamespace {
                name,
                namespace_id: field("namespace_id")?,
            }),
            // "d1_database" 是旧版前端使用的名称，提交时统一为 "d1"
            Some("d1" | "d1_database") => Some(Self::D1Database {
                name,
                database_id: database_id()?,
            }),
            Some(_) => None,
            None => {
                if let Some(namespace_id) = field("namespace_id") {
                    Some(Self::KvNamespace { name, namespace_id })
                } else if let Some(database_id) = database_id() {
                    Some(Self::D1Database { name, database_id })
                } else {
                    field("text").map(|text| Self::PlainText { name, text })
                }
            }
        }
    }
}

impl ScriptSettings {
    /// Bindings of the kinds modelled by [`ScriptBinding`], in upstream order.
    pub fn known_bindings(&self) -> Vec<ScriptBinding> {
        self.bindings
            .iter()
            .filter_map(ScriptBinding::from_stored)
            .collect()
    }
}

/// Module format of a Workers script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// Classic format registering handlers through `addEventListener`.
    ServiceWorker,
    /// ES module format exporting a default handler object.
    EsModule,
}

impl ScriptFormat {
    /// Infers the format from script source.
    pub fn detect(source: &str) -> Self {
        if source.contains("addEventListener") {
            Self::ServiceWorker
        } else {
            Self::EsModule
        }
    }

    /// Content type of the script part in a multipart upload.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::ServiceWorker => "application/javascript",
            Self::EsModule => "application/javascript+module",
        }
    }
}

/// The `metadata` part of a multipart script upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadMetadata<'a> {
    pub bindings: &'a [ScriptBinding],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_part: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_module: Option<&'static str>,
}

impl<'a> UploadMetadata<'a> {
    pub fn new(format: ScriptFormat, bindings: &'a [ScriptBinding]) -> Self {
        match format {
            ScriptFormat::ServiceWorker => Self {
                bindings,
                body_part: Some(SCRIPT_PART_NAME),
                main_module: None,
            },
            ScriptFormat::EsModule => Self {
                bindings,
                body_part: None,
                main_module: Some(SCRIPT_PART_NAME),
            },
        }
    }
}

/// Extracts script source from a script download body.
///
/// Some responses wrap the source in a JSON object under `script`; raw
/// source is returned unchanged.
pub fn extract_script_source(body: &str) -> String {
    if body.trim_start().starts_with('{')
        && let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body)
    {
        return obj
            .get("script")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
    }
    body.to_string()
}
