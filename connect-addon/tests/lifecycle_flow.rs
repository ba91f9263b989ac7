use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use axum::Router;
use common_connect_jwt::ConfigStore;
use connect_addon::{build_router, AddonConfig, AppState};
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt; // oneshot

fn app(store: ConfigStore) -> Router {
    let state = AppState::new(AddonConfig::new("https://addon.example.com"), store);
    build_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn install_payload(base_url: &str) -> Value {
    json!({
        "key": "connect-jwt-example",
        "clientKey": "client-123",
        "publicKey": "ignored",
        "sharedSecret": "install-secret",
        "serverVersion": "100",
        "pluginsVersion": "1.0",
        "baseUrl": base_url,
        "productType": "jira",
        "description": "Test instance",
        "eventType": "installed"
    })
}

fn issue_event(key: &str) -> Value {
    json!({
        "timestamp": 1_700_000_000_000_i64,
        "webhookEvent": "jira:issue_updated",
        "issue_event_type_name": "issue_generic",
        "issue": {
            "id": "10001",
            "self": "https://example.atlassian.net/rest/api/2/issue/10001",
            "key": key
        }
    })
}

#[tokio::test]
async fn health_and_descriptor() {
    let app = app(ConfigStore::new());

    let response = app
        .clone()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::get("/atlassian-connect.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let descriptor = body_json(response).await;
    assert_eq!(descriptor["baseUrl"], "https://addon.example.com");
    assert_eq!(descriptor["authentication"]["type"], "jwt");
}

#[tokio::test]
async fn installed_publishes_config() {
    let store = ConfigStore::new();
    let response = app(store.clone())
        .oneshot(post_json(
            "/installed",
            install_payload("https://example.atlassian.net"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["OK"]));

    let config = store.load().expect("config published");
    assert_eq!(config.key, "connect-jwt-example");
    assert_eq!(config.client_key, "client-123");
    assert_eq!(config.shared_secret, "install-secret");
    assert_eq!(config.base_url, "https://example.atlassian.net");
}

#[tokio::test]
async fn installed_without_secret_is_rejected() {
    let store = ConfigStore::new();
    let mut payload = install_payload("https://example.atlassian.net");
    payload["sharedSecret"] = json!("");

    let response = app(store.clone())
        .oneshot(post_json("/installed", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    assert!(!store.is_configured());
}

#[tokio::test]
async fn uninstalled_clears_config() {
    let store = ConfigStore::new();
    let app = app(store.clone());
    app.clone()
        .oneshot(post_json(
            "/installed",
            install_payload("https://example.atlassian.net"),
        ))
        .await
        .unwrap();
    assert!(store.is_configured());

    let response = app
        .oneshot(post_json("/uninstalled", json!({ "eventType": "uninstalled" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!store.is_configured());
}

#[tokio::test]
async fn issue_event_before_install_is_unavailable() {
    let response = app(ConfigStore::new())
        .oneshot(post_json("/issue_event", issue_event("DEMO-1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "NOT_INSTALLED");
}

#[tokio::test]
async fn issue_event_fetches_issue_with_signed_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/api/2/issue/DEMO-1")
                .header_exists("authorization");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":"10001","key":"DEMO-1","fields":{"summary":"Test"}}"#);
        })
        .await;

    let store = ConfigStore::new();
    let app = app(store.clone());
    app.clone()
        .oneshot(post_json("/installed", install_payload(&server.base_url())))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json("/issue_event", issue_event("DEMO-1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["OK"]));
    mock.assert_async().await;
}

#[tokio::test]
async fn issue_event_reports_upstream_failure() {
    let server = MockServer::start_async().await;
    let _mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/rest/api/2/issue/DEMO-2");
            then.status(404);
        })
        .await;

    let store = ConfigStore::new();
    store.publish(common_connect_jwt::Config::new(
        "connect-jwt-example",
        "client-123",
        "install-secret",
        server.base_url(),
    ));

    let response = app(store)
        .oneshot(post_json("/issue_event", issue_event("DEMO-2")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM");
}

#[tokio::test]
async fn issue_event_rejects_path_like_keys() {
    let store = ConfigStore::new();
    store.publish(common_connect_jwt::Config::new(
        "connect-jwt-example",
        "client-123",
        "install-secret",
        "https://example.atlassian.net",
    ));

    let app = app(store);

    for key in ["../admin", "..", "DEMO-1?jwt=x", "DEMO-1#x"] {
        let response = app
            .clone()
            .oneshot(post_json("/issue_event", issue_event(key)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{key}");
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }
}
