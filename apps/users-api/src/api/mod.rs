//! API routes module
//!
//! Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod accounts;
pub mod auth;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/users", users::router(state))
        .nest("/authentication", auth::router(state))
        .nest("/banking", accounts::router(state))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum_helpers::{ErrorResponse, JwtConfig};
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::MongoConfig;
    use http_body_util::BodyExt;
    use mongodb::Client;
    use serde_json::{Value, json};
    use tower::ServiceExt; // For oneshot()

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    /// State pointing at a port nothing listens on. The driver connects
    /// lazily, so routes that never touch storage work normally.
    async fn unreachable_state() -> AppState {
        let url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";
        let config = Config {
            app: app_info!(),
            mongodb: MongoConfig::with_database(url, "users_api_test"),
            server: ServerConfig::default(),
            jwt: JwtConfig::new(SECRET).unwrap(),
            environment: Environment::Development,
        };
        let client = Client::with_uri_str(url).await.unwrap();
        let db = client.database(config.mongodb.database());
        AppState::new(config, client, db)
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_users_require_a_token() {
        let app = routes(&unreachable_state().await);

        let response = app
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.error, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_users_reject_a_forged_token() {
        let app = routes(&unreachable_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_banking_is_public_and_validates_before_storage() {
        let app = routes(&unreachable_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/banking/accounts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"nim": "1203", "name": "J", "email": "j@x.io", "balance": 5})
                            .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = json_body(response).await;
        assert_eq!(body.message, "NIM must be even");
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_mongodb() {
        let app = routes(&unreachable_state().await);

        let response = app
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = json_body(response).await;
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["mongodb"], "disconnected");
    }
}
