//! Handler tests for the banking accounts router

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum_helpers::ErrorResponse;
use domain_accounts::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_raw(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/accounts")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    post_raw(&body.to_string())
}

struct FailingRepository;

#[async_trait]
impl AccountRepository for FailingRepository {
    async fn create(&self, _account: Account) -> AccountResult<Account> {
        Err(AccountError::Database(
            "No suitable servers found: server selection timeout".into(),
        ))
    }
}

#[tokio::test]
async fn test_create_account_returns_created() {
    let repo = InMemoryAccountRepository::new();
    let app = handlers::router(AccountService::new(repo.clone()));

    let response = app
        .oneshot(post_json(json!({
            "nim": "1202",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "balance": 1500
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CreateAccountResponse = json_body(response).await;
    assert_eq!(body.message, "Account created successfully");
    assert_eq!(body.account.nim, "1202");
    assert_eq!(body.account.email, "jane@example.com");

    let stored = repo.all().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, body.account.id);
}

#[tokio::test]
async fn test_missing_field_is_bad_request() {
    let repo = InMemoryAccountRepository::new();
    let app = handlers::router(AccountService::new(repo.clone()));

    let response = app
        .oneshot(post_json(json!({
            "nim": "1202",
            "name": "Jane Doe",
            "balance": 1500
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.message, "Invalid request body");
    assert!(repo.all().await.is_empty());
}

#[tokio::test]
async fn test_zero_balance_is_bad_request() {
    let app = handlers::router(AccountService::new(InMemoryAccountRepository::new()));

    let response = app
        .oneshot(post_json(json!({
            "nim": "1202",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "balance": 0
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.message, "Invalid request body");
}

#[tokio::test]
async fn test_odd_nim_is_bad_request() {
    let repo = InMemoryAccountRepository::new();
    let app = handlers::router(AccountService::new(repo.clone()));

    let response = app
        .oneshot(post_json(json!({
            "nim": "1203",
            "name": "Jane Doe",
            "email": "jane@example.com",
            "balance": 1500
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.message, "NIM must be even");
    assert!(repo.all().await.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_invalid_body() {
    let app = handlers::router(AccountService::new(InMemoryAccountRepository::new()));

    let response = app.oneshot(post_raw("{\"nim\": ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.message, "Invalid request body");
}

#[tokio::test]
async fn test_storage_failure_is_generic_500() {
    let app = handlers::router(AccountService::new(FailingRepository));

    let response = app
        .oneshot(post_json(json!({
            "nim": 1202,
            "name": "Jane Doe",
            "email": "jane@example.com",
            "balance": 1500
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = json_body(response).await;
    assert_eq!(body.message, "Internal server error");
    assert!(!body.message.contains("server selection"));
}
