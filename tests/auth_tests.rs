use serde_json::json;
use std::sync::Arc;
use storefront_rust::auth::{LoginRequest, RegisterRequest};
use storefront_rust::config::ClientOptions;
use storefront_rust::storage::{LocalStore, MemoryStore};
use storefront_rust::Storefront;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> serde_json::Value {
    json!({
        "id": 42,
        "username": "linh",
        "email": "linh@example.com",
        "firstName": "Linh",
        "lastName": "Tran",
        "isActive": true,
        "roles": [{"id": 1, "name": "USER"}, {"id": 2, "name": "ADMIN"}]
    })
}

#[tokio::test]
async fn login_stores_session() {
    // モックサーバーの起動
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "test_token",
            "user": user_json()
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let storefront = Storefront::new(&mock_server.uri(), store.clone());
    storefront.init().await.unwrap();

    assert!(!storefront.auth().is_logged_in());

    let response = storefront
        .auth()
        .login(&LoginRequest {
            username: "linh".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.token, "test_token");
    assert_eq!(response.user.username, "linh");
    assert!(storefront.auth().is_logged_in());
    assert_eq!(storefront.auth().access_token().as_deref(), Some("test_token"));

    // トークンとユーザーが永続化される
    assert_eq!(store.load("token").await.unwrap().as_deref(), Some("test_token"));
    assert!(store.load("user").await.unwrap().is_some());
}

#[tokio::test]
async fn restore_session_from_store() {
    let store = Arc::new(MemoryStore::new());
    store.save("token", "persisted_token").await.unwrap();
    store
        .save("user", &user_json().to_string())
        .await
        .unwrap();

    // カートの読み込みは失敗してよい(到達不能なURL)ので空カートに落ちる
    let storefront = Storefront::new("http://localhost:1", store);
    storefront.init().await.unwrap();

    assert!(storefront.auth().is_logged_in());
    let user = storefront.auth().current_user().unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.full_name(), "Linh Tran");
}

#[tokio::test]
async fn malformed_persisted_user_means_no_session() {
    let store = Arc::new(MemoryStore::new());
    store.save("token", "persisted_token").await.unwrap();
    store.save("user", "{{{ not json").await.unwrap();

    let storefront = Storefront::new("http://localhost:1", store.clone());
    storefront.init().await.unwrap();

    assert!(!storefront.auth().is_logged_in());
    // 壊れたセッションは破棄される
    assert_eq!(store.load("token").await.unwrap(), None);
    assert_eq!(store.load("user").await.unwrap(), None);
}

#[tokio::test]
async fn logout_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "test_token",
            "user": user_json()
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let storefront = Storefront::new(&mock_server.uri(), store.clone());
    storefront.init().await.unwrap();

    storefront
        .auth()
        .login(&LoginRequest {
            username: "linh".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();
    assert!(storefront.auth().is_logged_in());

    storefront.auth().logout().await.unwrap();

    assert!(!storefront.auth().is_logged_in());
    assert_eq!(store.load("token").await.unwrap(), None);
    assert_eq!(store.load("user").await.unwrap(), None);
}

#[tokio::test]
async fn register_with_token_signs_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Account created",
            "token": "fresh_token",
            "user": user_json()
        })))
        .mount(&mock_server)
        .await;

    let storefront = Storefront::new(&mock_server.uri(), Arc::new(MemoryStore::new()));
    storefront.init().await.unwrap();

    let response = storefront
        .auth()
        .register(&RegisterRequest {
            username: "linh".to_string(),
            email: "linh@example.com".to_string(),
            first_name: "Linh".to_string(),
            last_name: "Tran".to_string(),
            phone: None,
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.message, "Account created");
    assert!(storefront.auth().is_logged_in());
    assert_eq!(storefront.auth().access_token().as_deref(), Some("fresh_token"));
}

#[tokio::test]
async fn role_helpers() {
    let store = Arc::new(MemoryStore::new());
    store.save("token", "persisted_token").await.unwrap();
    store.save("user", &user_json().to_string()).await.unwrap();

    let storefront = Storefront::new("http://localhost:1", store);
    storefront.init().await.unwrap();

    assert!(storefront.auth().has_role("USER"));
    assert!(storefront.auth().is_admin());
    assert!(!storefront.auth().is_seller());
    assert!(storefront.auth().has_any_role(&["SELLER", "ADMIN"]));
    assert!(!storefront.auth().has_any_role(&["SELLER"]));
}

#[tokio::test]
async fn disabled_persistence_keeps_session_in_memory_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "test_token",
            "user": user_json()
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let storefront = Storefront::new_with_options(
        &mock_server.uri(),
        store.clone(),
        ClientOptions::default().with_persist_session(false),
    );
    storefront.init().await.unwrap();

    storefront
        .auth()
        .login(&LoginRequest {
            username: "linh".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert!(storefront.auth().is_logged_in());
    // 永続化は無効なのでストアには何も残らない
    assert_eq!(store.load("token").await.unwrap(), None);
    assert_eq!(store.load("user").await.unwrap(), None);
}
