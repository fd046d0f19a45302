//! 存储与客户端抽象 trait 定义

mod client_factory;
mod credential_store;

pub use client_factory::{ClientFactory, HttpClientFactory};
pub use credential_store::CredentialStore;
