//! Client factory function.

use std::sync::Arc;

use crate::client::{ClientConfig, CloudflareClient};
use crate::error::Result;
use crate::traits::CloudflareApi;

/// Creates a [`CloudflareApi`] bound to one bearer token.
///
/// The returned client is wrapped in `Arc<dyn CloudflareApi>` so callers can
/// hold it behind the trait and substitute test doubles.
///
/// # Examples
///
/// ```rust,no_run
/// use cf_manager_provider::{create_client, ClientConfig};
///
/// let client = create_client("your-token", &ClientConfig::default()).unwrap();
/// ```
pub fn create_client(
    api_token: impl Into<String>,
    config: &ClientConfig,
) -> Result<Arc<dyn CloudflareApi>> {
    Ok(Arc::new(CloudflareClient::new(api_token, config)?))
}
