//! cf-manager Core Library
//!
//! Business logic for managing Cloudflare resources on behalf of many users,
//! each holding one or more API-token credentials:
//! - Credential registration and encrypted storage (`AccountService`, `CredentialVault`)
//! - Workers scripts and bindings, Workers KV, D1, DNS and Pages services
//! - Per-item bulk operations (`BulkRunner`)
//! - Zone-file import and export
//!
//! Storage is abstracted behind [`CredentialStore`] and upstream access behind
//! [`ClientFactory`], so the same services run against any persistence layer.

pub mod bulk;
pub mod crypto;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod zone_file;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use bulk::BulkRunner;
pub use crypto::CredentialVault;
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{ClientFactory, CredentialStore, HttpClientFactory};
