//! `CredentialStore` adapters for frontends without their own database.

mod file_store;
mod memory_store;

pub use file_store::JsonFileCredentialStore;
pub use memory_store::InMemoryCredentialStore;
