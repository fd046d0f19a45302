//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::time::Duration;

use cf_manager_provider::{ClientConfig, CloudflareClient};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_TOKEN: &str = "test-token";
pub const ACCOUNT_ID: &str = "acc-1";

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 启动 mock server 并创建指向它的客户端（不重试）
pub async fn setup() -> (MockServer, CloudflareClient) {
    setup_with_retries(0).await
}

pub async fn setup_with_retries(max_retries: u32) -> (MockServer, CloudflareClient) {
    let server = MockServer::start().await;
    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_max_retries(max_retries);
    let client = match CloudflareClient::new(TEST_TOKEN, &config) {
        Ok(client) => client,
        Err(e) => panic!("failed to build client: {e}"),
    };
    (server, client)
}

/// 带重试且请求超时较短的客户端
pub async fn setup_with_timeout(
    max_retries: u32,
    request_timeout: Duration,
) -> (MockServer, CloudflareClient) {
    let server = MockServer::start().await;
    let config = ClientConfig {
        request_timeout,
        ..ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(max_retries)
    };
    let client = match CloudflareClient::new(TEST_TOKEN, &config) {
        Ok(client) => client,
        Err(e) => panic!("failed to build client: {e}"),
    };
    (server, client)
}

/// 成功信封
pub fn ok_envelope(result: Value) -> Value {
    json!({ "success": true, "errors": [], "messages": [], "result": result })
}

/// 带数字分页信息的成功信封
pub fn page_envelope(items: Value, page: u32, total_pages: u32) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": items,
        "result_info": { "page": page, "per_page": 50, "total_pages": total_pages }
    })
}

/// 带游标的成功信封
pub fn cursor_envelope(items: Value, cursor: &str) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": items,
        "result_info": { "count": 2, "cursor": cursor }
    })
}

/// 失败信封
pub fn error_envelope(code: i64, message: &str) -> Value {
    json!({
        "success": false,
        "errors": [{ "code": code, "message": message }],
        "messages": [],
        "result": null
    })
}

pub fn zones(names: &[&str]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|n| json!({ "id": format!("id-{n}"), "name": n, "status": "active" }))
            .collect(),
    )
}

pub fn keys(names: &[&str]) -> Value {
    Value::Array(names.iter().map(|n| json!({ "name": n })).collect())
}
