//! Workers script endpoints against a mock upstream

mod common;

use cf_manager_provider::{ProviderError, ScriptBinding};
use common::{ACCOUNT_ID, error_envelope, ok_envelope, setup};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, Request, ResponseTemplate};

fn script_path(name: &str) -> String {
    format!("/accounts/{ACCOUNT_ID}/workers/scripts/{name}")
}

fn last_put(requests: &[Request]) -> String {
    let put = requests
        .iter()
        .rev()
        .find(|r| r.method.as_str() == "PUT");
    match put {
        Some(r) => String::from_utf8_lossy(&r.body).into_owned(),
        None => panic!("no PUT request recorded"),
    }
}

#[tokio::test]
async fn update_bindings_reuploads_service_worker_script() {
    let (server, client) = setup().await;
    let source = "addEventListener('fetch', e => e.respondWith(new Response('hi')))";

    Mock::given(method("GET"))
        .and(path(script_path("my-worker").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(source))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(script_path("my-worker").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({ "id": "my-worker" }))))
        .expect(1)
        .mount(&server)
        .await;

    let bindings = vec![
        ScriptBinding::KvNamespace {
            name: "CACHE".into(),
            namespace_id: "ns1".into(),
        },
        ScriptBinding::D1Database {
            name: "DB".into(),
            database_id: "db1".into(),
        },
    ];
    let script = require_ok!(
        client
            .update_script_bindings(ACCOUNT_ID, "my-worker", &bindings)
            .await
    );
    assert_eq!(script.id, "my-worker");

    let requests = server.received_requests().await.unwrap_or_default();
    let body = last_put(&requests);
    assert!(body.contains(r#"name="metadata""#));
    assert!(body.contains(r#""body_part":"index.js""#));
    assert!(!body.contains("main_module"));
    assert!(body.contains(r#"{"type":"kv_namespace","name":"CACHE","namespace_id":"ns1"}"#));
    assert!(body.contains(r#"{"type":"d1","name":"DB","id":"db1"}"#));
    assert!(body.contains(r#"filename="index.js""#));
    assert!(body.contains("Content-Type: application/javascript\r\n"));
    assert!(body.contains(source));
}

#[tokio::test]
async fn update_bindings_unwraps_json_body_and_detects_module() {
    let (server, client) = setup().await;
    let source = "export default { async fetch() { return new Response('ok') } }";

    Mock::given(method("GET"))
        .and(path(script_path("mod-worker").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "script": source })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(script_path("mod-worker").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({ "id": "mod-worker" }))))
        .expect(1)
        .mount(&server)
        .await;

    let bindings = vec![ScriptBinding::PlainText {
        name: "GREETING".into(),
        text: "hello".into(),
    }];
    require_ok!(
        client
            .update_script_bindings(ACCOUNT_ID, "mod-worker", &bindings)
            .await
    );

    let requests = server.received_requests().await.unwrap_or_default();
    let body = last_put(&requests);
    assert!(body.contains(r#""main_module":"index.js""#));
    assert!(!body.contains("body_part"));
    assert!(body.contains("application/javascript+module"));
    assert!(body.contains(source));
    assert!(!body.contains(r#"{"script""#));
}

#[tokio::test]
async fn update_bindings_for_missing_script_never_uploads() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(script_path("ghost").as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_envelope(10007, "workers.api.error.script_not_found")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.update_script_bindings(ACCOUNT_ID, "ghost", &[]).await;
    assert!(
        matches!(&result, Err(ProviderError::NotFound { resource, .. }) if resource.contains("ghost")),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn update_bindings_refuses_to_upload_empty_source() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(script_path("opaque").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "etag": "abc" })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.update_script_bindings(ACCOUNT_ID, "opaque", &[]).await;
    assert!(
        matches!(&result, Err(ProviderError::ParseError { detail }) if detail.contains("opaque")),
        "unexpected result: {result:?}"
    );
}

#[tokio::test]
async fn upload_script_sends_javascript_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(script_path("hello").as_str()))
        .and(header("content-type", "application/javascript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "id": "hello",
            "created_on": "2024-01-01T00:00:00Z",
            "modified_on": "2024-01-02T00:00:00Z"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let script = require_ok!(client.upload_script(ACCOUNT_ID, "hello", "addEventListener('fetch', () => {})").await);
    assert_eq!(script.id, "hello");
    assert!(script.modified_on.is_some());
}

#[tokio::test]
async fn settings_expose_known_bindings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("{}/settings", script_path("hello")).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "bindings": [
                { "type": "kv_namespace", "name": "CACHE", "namespace_id": "ns1" },
                { "type": "durable_object_namespace", "name": "DO", "class_name": "Counter" }
            ],
            "compatibility_date": "2024-01-01"
        }))))
        .mount(&server)
        .await;

    let settings = require_ok!(client.get_script_settings(ACCOUNT_ID, "hello").await);
    assert_eq!(settings.bindings.len(), 2);
    assert_eq!(settings.compatibility_date.as_deref(), Some("2024-01-01"));
    assert_eq!(
        settings.known_bindings(),
        vec![ScriptBinding::KvNamespace {
            name: "CACHE".into(),
            namespace_id: "ns1".into(),
        }]
    );
}
