//! # cf-manager-provider
//!
//! A typed client for the Cloudflare v4 REST API covering the resource
//! families managed by cf-manager.
//!
//! ## Supported Resources
//!
//! | Family | Operations | Paging |
//! |--------|-----------|--------|
//! | Accounts | list | numeric, 50 per page |
//! | Workers scripts | list, download, upload, delete, settings, bindings update | numeric, 50 per page |
//! | Workers KV | namespaces CRUD, keys list, value get/put/delete | namespaces numeric, keys cursor |
//! | D1 | list databases | single page, caller driven |
//! | DNS | zones list, records CRUD | zones 50, records 100 per page |
//! | Pages | projects, deployments list/create | none |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: platform native TLS.
//! - **`rustls`**: pure-Rust TLS for static builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cf_manager_provider::{create_client, ClientConfig, CloudflareApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_client("your-token", &ClientConfig::default())?;
//!
//!     // Every list call walks all upstream pages before returning
//!     let zones = client.list_zones().await?;
//!     for zone in &zones.items {
//!         let records = client.list_dns_records(&zone.id).await?;
//!         println!("{}: {} records", zone.name, records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pagination
//!
//! `list_*` methods returning [`AggregatedResult`] fetch pages one at a time
//! until an empty page or a missing continuation signal (`page < total_pages`
//! for numeric paging, a non-empty `cursor` for KV keys). If any page fails
//! the whole listing fails and no partial result is returned.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Known
//! upstream error codes map to structured variants; anything else becomes
//! [`ProviderError::Upstream`] carrying the response's full `errors` array.
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) of idempotent
//! requests are retried with exponential backoff.

mod bindings;
mod client;
mod error;
mod factory;
mod http_client;
mod traits;
mod types;
mod utils;

pub use bindings::{
    SCRIPT_PART_NAME, ScriptBinding, ScriptFormat, UploadMetadata, extract_script_source,
};
pub use client::{CF_API_BASE, ClientConfig, CloudflareClient};
pub use error::{ProviderError, Result};
pub use factory::create_client;
pub use traits::CloudflareApi;
pub use types::{
    Account, AggregatedResult, ApiEnvelope, ApiMessage, D1Database, DnsRecord, DnsRecordPayload,
    KvKey, KvNamespace, Page, PagesDeployment, PagesProject, ResultInfo, ScriptSettings,
    WorkerScript, Zone,
};
pub use utils::log_sanitizer;
