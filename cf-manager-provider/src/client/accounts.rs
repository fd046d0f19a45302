//! Accounts endpoints

use crate::error::Result;
use crate::traits::ErrorContext;
use crate::types::{Account, AggregatedResult};

use super::{CloudflareClient, PAGE_SIZE_DEFAULT};

impl CloudflareClient {
    /// 列出 Token 可访问的全部账号（自动翻页）
    pub async fn list_accounts(&self) -> Result<AggregatedResult<Account>> {
        self.get_all_pages(
            "/accounts",
            PAGE_SIZE_DEFAULT,
            &ErrorContext::resource("accounts"),
        )
        .await
    }
}
