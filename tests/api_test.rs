use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use redis_profile::{
    AppState,
    cache::{
        CachePolicy, CacheStore, CustomerDataService, MemoryStore, SupportInquiry,
        keys::ProfileKeyStyle, store::CacheConnection,
    },
    config::Config,
    crm::DemoDirectory,
    routes,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const PASSWORD: &str = "secret";

fn test_config() -> Config {
    Config {
        redis_url: "redis://127.0.0.1/".into(),
        redis_pool_size: 1,
        jwt_secret: "test-secret".into(),
        jwt_expiration_secs: 3600,
        token_ttl_minutes: 5,
        data_ttl_minutes: 120,
        profile_key_style: ProfileKeyStyle::Profiles,
        crm_base_url: None,
        server_host: "127.0.0.1".into(),
        server_port: 0,
    }
}

fn setup_test_app() -> (MemoryStore, Router) {
    let store = MemoryStore::new();
    let cache = CustomerDataService::new(store.clone(), CachePolicy::default())
        .register_sub_record::<SupportInquiry>();
    let crm = DemoDirectory::seeded(4, PASSWORD).unwrap();

    let state = AppState::new(test_config(), cache, Arc::new(crm));
    (store, routes::router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/account/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "username": username, "password": password }).to_string(),
        ))
        .unwrap()
}

fn authorized(method: Method, uri: &str, jwt: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {jwt}"))
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router) -> String {
    let (status, body) = send(app, login_request("stefan", PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    body["content"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_ping() {
    let (_, app) = setup_test_app();
    let response = app
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn test_login_profile_logoff_flow() {
    let (store, app) = setup_test_app();

    let (status, body) = send(&app, login_request("stefan", PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["user_id"], 1210);
    let jwt = body["content"]["token"].as_str().unwrap().to_string();
    assert!(store.contains_key("profiles:1210"));
    assert!(store.contains_key("supportinquirys:1210"));

    let (status, body) = send(&app, authorized(Method::GET, "/my-profile", &jwt)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["basic_data"]["first_name"], "Stefan");
    assert_eq!(body["content"]["basic_data"]["last_name"], "Olsen");
    assert_eq!(
        body["content"]["support_inquiries"][0]["description"],
        "Where is my order?"
    );

    let (status, _) = send(&app, authorized(Method::POST, "/account/logoff", &jwt)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!store.contains_key("profiles:1210"));
    assert!(!store.contains_key("supportinquirys:1210"));
    assert!(!store.contains_key("supportinquiry:1"));

    let (status, body) = send(&app, authorized(Method::GET, "/my-profile", &jwt)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (store, app) = setup_test_app();

    let (status, body) = send(&app, login_request("stefan", "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error_message"].is_string());
    assert!(!store.contains_key("profiles:1210"));
}

#[tokio::test]
async fn test_login_invalid_username() {
    let (_, app) = setup_test_app();

    let (status, _) = send(&app, login_request("../stefan", PASSWORD)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_store_down() {
    let (store, app) = setup_test_app();
    store.set_offline(true);

    let (status, body) = send(&app, login_request("stefan", PASSWORD)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
}

#[tokio::test]
async fn test_profile_requires_bearer() {
    let (_, app) = setup_test_app();

    let request = Request::builder()
        .uri("/my-profile")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, authorized(Method::GET, "/my-profile", "not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logoff_without_session_still_succeeds() {
    let (_, app) = setup_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/account/logoff")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
}

#[tokio::test]
async fn test_expired_profile_is_reloaded() {
    let (store, app) = setup_test_app();
    let jwt = login(&app).await;

    // 资料比令牌先过期
    let mut conn = store.connection().await.unwrap();
    conn.del(&["profiles:1210".to_string()]).await.unwrap();
    assert!(!store.contains_key("profiles:1210"));

    let (status, body) = send(&app, authorized(Method::GET, "/my-profile", &jwt)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["basic_data"]["user_id"], 1210);
    assert_eq!(body["content"]["support_inquiries"].as_array().unwrap().len(), 1);
    assert!(store.contains_key("profiles:1210"));
}

#[tokio::test]
async fn test_support_inquiry_paging() {
    let (_, app) = setup_test_app();
    let jwt = login(&app).await;

    let (status, body) = send(
        &app,
        authorized(Method::GET, "/my-profile?offset=1&count=10", &jwt),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["support_inquiries"], json!([]));
}

#[tokio::test(start_paused = true)]
async fn test_idle_session_expires() {
    let (_, app) = setup_test_app();
    let jwt = login(&app).await;
    let token_ttl = CachePolicy::default().token_ttl;

    // 活跃期间不断续期
    for _ in 0..3 {
        tokio::time::advance(token_ttl - Duration::from_secs(10)).await;
        let (status, _) = send(&app, authorized(Method::GET, "/my-profile", &jwt)).await;
        assert_eq!(status, StatusCode::OK);
    }

    tokio::time::advance(token_ttl + Duration::from_secs(1)).await;
    let (status, _) = send(&app, authorized(Method::GET, "/my-profile", &jwt)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
