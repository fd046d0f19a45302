//! Workers KV endpoints and retry behaviour against a mock upstream

mod common;

use cf_manager_provider::ProviderError;
use std::time::Duration;

use common::{
    ACCOUNT_ID, error_envelope, ok_envelope, setup, setup_with_retries, setup_with_timeout,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn value_path(key: &str) -> String {
    format!("/accounts/{ACCOUNT_ID}/storage/kv/namespaces/ns1/values/{key}")
}

#[tokio::test]
async fn get_value_returns_raw_bytes() {
    let (server, client) = setup().await;
    let raw: &[u8] = b"{\"theme\":\"dark\"}\n";

    Mock::given(method("GET"))
        .and(path(value_path("prefs").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(raw.to_vec(), "application/octet-stream"))
        .mount(&server)
        .await;

    let bytes = require_ok!(client.get_kv_value(ACCOUNT_ID, "ns1", "prefs").await);
    assert_eq!(bytes, raw);
}

#[tokio::test]
async fn get_value_encodes_key_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(value_path("user%2F42").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("v"))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = require_ok!(client.get_kv_value(ACCOUNT_ID, "ns1", "user/42").await);
    assert_eq!(bytes, b"v");
}

#[tokio::test]
async fn missing_key_maps_to_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(value_path("gone").as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_envelope(10009, "get: 'key not found'")))
        .mount(&server)
        .await;

    let result = client.get_kv_value(ACCOUNT_ID, "ns1", "gone").await;
    assert!(
        matches!(&result, Err(ProviderError::NotFound { resource, .. }) if resource == "kv key 'gone'"),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn put_value_sends_value_and_metadata_parts() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(value_path("greeting").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    let metadata = json!({ "owner": "ops" });
    require_ok!(
        client
            .put_kv_value(ACCOUNT_ID, "ns1", "greeting", "hello world", Some(&metadata))
            .await
    );

    let requests = server.received_requests().await.unwrap_or_default();
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();
    assert!(body.contains(r#"name="value""#));
    assert!(body.contains("hello world"));
    assert!(body.contains(r#"name="metadata""#));
    assert!(body.contains(r#"{"owner":"ops"}"#));
}

#[tokio::test]
async fn put_value_without_metadata_sends_single_part() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(value_path("plain").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .mount(&server)
        .await;

    require_ok!(client.put_kv_value(ACCOUNT_ID, "ns1", "plain", "x", None).await);

    let requests = server.received_requests().await.unwrap_or_default();
    let body = String::from_utf8_lossy(&requests[0].body).into_owned();
    assert!(!body.contains(r#"name="metadata""#));
}

#[tokio::test]
async fn namespace_title_conflict_maps_to_already_exists() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("/accounts/{ACCOUNT_ID}/storage/kv/namespaces").as_str()))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope(10014, "a namespace with this account ID and title already exists")))
        .mount(&server)
        .await;

    let result = client.create_kv_namespace(ACCOUNT_ID, "cache").await;
    assert!(matches!(result, Err(ProviderError::AlreadyExists { .. })));
}

#[tokio::test]
async fn idempotent_get_is_retried_after_gateway_error() {
    let (server, client) = setup_with_retries(2).await;

    Mock::given(method("GET"))
        .and(path(value_path("flaky").as_str()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(value_path("flaky").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = require_ok!(client.get_kv_value(ACCOUNT_ID, "ns1", "flaky").await);
    assert_eq!(bytes, b"recovered");
}

#[tokio::test]
async fn post_is_never_retried() {
    let (server, client) = setup_with_retries(2).await;

    Mock::given(method("POST"))
        .and(path(format!("/accounts/{ACCOUNT_ID}/storage/kv/namespaces").as_str()))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.create_kv_namespace(ACCOUNT_ID, "cache").await;
    assert!(matches!(result, Err(ProviderError::NetworkError { .. })));
}

#[tokio::test]
async fn timed_out_delete_is_not_replayed() {
    let (server, client) = setup_with_timeout(2, Duration::from_millis(200)).await;

    // 上游已执行删除但响应过慢；若被重放，第二次会得到 404
    Mock::given(method("DELETE"))
        .and(path(value_path("k").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_envelope(json!(null)))
                .set_delay(Duration::from_millis(600)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(value_path("k").as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_envelope(10009, "key not found")))
        .mount(&server)
        .await;

    let result = client.delete_kv_value(ACCOUNT_ID, "ns1", "k").await;
    assert!(
        matches!(result, Err(ProviderError::Timeout { .. })),
        "unexpected result: {result:?}"
    );

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
}
