// cave-client/tests/client_integration.rs
// Runs the client against a small in-process stub of the server API.

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use cave_client::{ClientConfig, ClientError, Session};
use serde_json::{Value, json};

const GOOD_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIiwidXNlcm5hbWUiOiJhbmEiLCJyb2xlIjoidXNlciIsImV4cCI6NDEwMjQ0NDgwMCwiaWF0IjoxNzE3MjAwMDAwfQ.sig";
const REVOKED_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIyIiwidXNlcm5hbWUiOiJib2IiLCJyb2xlIjoidXNlciIsImV4cCI6NDEwMjQ0NDgwMCwiaWF0IjoxNzE3MjAwMDAwfQ.sig";

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn error(status: StatusCode, code: u16, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "code": code, "message": message })))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != "secret" {
        return error(StatusCode::UNAUTHORIZED, 1002, "Invalid username or password");
    }
    (
        StatusCode::OK,
        Json(json!({
            "token": GOOD_TOKEN,
            "user": {"id": 1, "name": "Ana", "username": "ana", "image": null, "role": "user", "created_at": 0}
        })),
    )
}

async fn verify(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers).as_deref() {
        Some(GOOD_TOKEN) => (
            StatusCode::OK,
            Json(json!({
                "valid": true,
                "user": {"sub": "1", "username": "ana", "role": "user", "exp": 4102444800i64, "iat": 1717200000}
            })),
        ),
        _ => error(StatusCode::UNAUTHORIZED, 1004, "Authentication token is invalid"),
    }
}

async fn products() -> Json<Value> {
    Json(json!([
        {"id": 2, "name": "Coffee", "image": null, "category": "Drinks", "created_at": 20},
        {"id": 1, "name": "Soap", "image": null, "category": null, "created_at": 10}
    ]))
}

async fn ask_cave(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if bearer(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, 1001, "User is not authenticated");
    }
    if body["product_id"] != 2 {
        return error(StatusCode::NOT_FOUND, 4001, "Product not found");
    }
    (
        StatusCode::OK,
        Json(json!({
            "suggested_user": {"id": 3, "name": "Caio", "username": "caio", "image": null},
            "reason": "Caio has never contributed to the Cave."
        })),
    )
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/verify-token", post(verify))
        .route("/api/products", get(products))
        .route("/api/ask-cave", post(ask_cave));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_login_stores_token() {
    let base = spawn_stub().await;
    let mut client = ClientConfig::new(base).build().unwrap();

    let err = client.login("ana", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!client.is_logged_in());

    let response = client.login("ana", "secret").await.unwrap();
    assert_eq!(response.user.username, "ana");
    assert_eq!(client.token(), Some(GOOD_TOKEN));

    let session = Session::from_token(response.token, 0).unwrap();
    assert_eq!(session.member_id(), Some(1));
}

#[tokio::test]
async fn test_list_products() {
    let base = spawn_stub().await;
    let client = ClientConfig::new(base).build().unwrap();

    let products = client.list_products(Some("Drinks")).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Coffee");
}

#[tokio::test]
async fn test_ask_cave() {
    let base = spawn_stub().await;
    let client = ClientConfig::new(base)
        .with_token(GOOD_TOKEN)
        .build()
        .unwrap();

    let suggestion = client.ask_cave(2, None).await.unwrap();
    assert_eq!(suggestion.suggested_user.name, "Caio");

    let err = client.ask_cave(99, None).await.unwrap_err();
    match err {
        ClientError::NotFound(message) => assert_eq!(message, "Product not found"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_check_session_revalidates() {
    let base = spawn_stub().await;
    let client = ClientConfig::new(base).build().unwrap();
    let now = 1_717_200_000_000;

    let mut session = Session::from_token(GOOD_TOKEN, now).unwrap();
    assert!(client.check_session_at(&mut session, false, now + 1000).await);
    assert_eq!(session.last_validated_at, now);

    assert!(client.check_session_at(&mut session, true, now + 2000).await);
    assert_eq!(session.last_validated_at, now + 2000);
}

#[tokio::test]
async fn test_check_session_rejected_by_server() {
    let base = spawn_stub().await;
    let client = ClientConfig::new(base).build().unwrap();
    let now = 1_717_200_000_000;

    let mut session = Session::from_token(REVOKED_TOKEN, now).unwrap();
    assert!(!client.check_session_at(&mut session, true, now).await);
}

#[tokio::test]
async fn test_check_session_survives_network_error() {
    // Nothing listens on port 1
    let client = ClientConfig::new("http://127.0.0.1:1")
        .with_timeout(2)
        .build()
        .unwrap();
    let now = 1_717_200_000_000;

    let mut session = Session::from_token(GOOD_TOKEN, now).unwrap();
    assert!(client.check_session_at(&mut session, true, now + 10 * 60 * 1000).await);
    assert_eq!(session.last_validated_at, now);
}

#[tokio::test]
async fn test_expired_session_is_dropped_locally() {
    let client = ClientConfig::new("http://127.0.0.1:1").build().unwrap();
    let mut session = Session::from_token(GOOD_TOKEN, 0).unwrap();
    let after_expiry = 4_102_444_800_000;
    assert!(!client.check_session_at(&mut session, false, after_expiry).await);
}
