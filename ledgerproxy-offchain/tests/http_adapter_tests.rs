use ledgerproxy_offchain::{
    AdapterError, AdapterRegistry, FieldDef, HttpAdapter, HttpAdapterConfig, OffChainAdapter,
    OffChainError, StoragePointer,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn adapter() -> HttpAdapter {
    HttpAdapter::new(&HttpAdapterConfig::default()).unwrap()
}

#[tokio::test]
async fn download_json_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hotel.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Inn"})))
        .expect(1)
        .mount(&server)
        .await;

    let doc = adapter()
        .download(&format!("{}/hotel.json", server.uri()))
        .await
        .unwrap();
    assert_eq!(doc, Some(json!({"name": "Inn"})));
}

#[tokio::test]
async fn sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "test-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = HttpAdapterConfig {
        user_agent: "test-agent".into(),
        ..Default::default()
    };
    let adapter = HttpAdapter::new(&config).unwrap();
    adapter.download(&format!("{}/doc", server.uri())).await.unwrap();
}

#[tokio::test]
async fn not_found_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let doc = adapter().download(&format!("{}/missing", server.uri())).await.unwrap();
    assert_eq!(doc, None);
}

#[tokio::test]
async fn empty_body_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let doc = adapter().download(&format!("{}/empty", server.uri())).await.unwrap();
    assert_eq!(doc, None);
}

#[tokio::test]
async fn server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = adapter()
        .download(&format!("{}/doc", server.uri()))
        .await
        .unwrap_err();
    match err {
        AdapterError::Network(msg) => assert!(msg.contains("boom")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn uploads_are_refused() {
    let adapter = adapter();
    assert!(matches!(
        adapter.upload(&json!({})).await,
        Err(AdapterError::ReadOnly("http"))
    ));
    assert!(matches!(
        adapter.update("http://x/doc", &json!({})).await,
        Err(AdapterError::ReadOnly(_))
    ));
}

#[tokio::test]
async fn storage_pointer_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/root"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"name": "Inn", "desc": format!("{}/desc", server.uri())}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"body": "Sea view"})))
        .expect(1)
        .mount(&server)
        .await;

    let registry = Arc::new(AdapterRegistry::new());
    registry.register("http", Arc::new(adapter())).await;

    let pointer = StoragePointer::new(
        format!("{}/root", server.uri()),
        [FieldDef::value("name"), FieldDef::pointer("desc", [FieldDef::value("body")])],
        registry,
    );
    assert_eq!(pointer.get_value("name").await.unwrap(), Some(json!("Inn")));
    let desc = pointer.get_pointer("desc").await.unwrap();
    assert_eq!(desc.get_value("body").await.unwrap(), Some(json!("Sea view")));
}

#[tokio::test]
async fn server_error_surfaces_as_download_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let registry = Arc::new(AdapterRegistry::new());
    registry.register("http", Arc::new(adapter())).await;
    let pointer = StoragePointer::new(format!("{}/doc", server.uri()), [FieldDef::value("name")], registry);

    assert!(matches!(
        pointer.get("name").await,
        Err(OffChainError::Download { .. })
    ));
}
