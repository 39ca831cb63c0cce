use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_helpers::errors::responses::{BadRequestResponse, InternalServerErrorResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, CreateAccount, CreateAccountResponse};
use crate::repository::AccountRepository;
use crate::service::AccountService;

#[derive(OpenApi)]
#[openapi(
    paths(create_account),
    components(
        schemas(Account, CreateAccount, CreateAccountResponse),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Banking", description = "Banking account endpoints")
    )
)]
pub struct ApiDoc;

/// `POST /accounts`
pub fn router<R: AccountRepository + 'static>(service: AccountService<R>) -> Router {
    Router::new()
        .route("/accounts", post(create_account))
        .with_state(Arc::new(service))
}

/// Open a banking account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Banking",
    request_body = CreateAccount,
    responses(
        (status = 201, description = "Account created", body = CreateAccountResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    payload: Result<Json<CreateAccount>, JsonRejection>,
) -> AccountResult<impl IntoResponse> {
    let Json(input) = payload.map_err(|e| {
        tracing::info!("Rejected account body: {}", e.body_text());
        AccountError::InvalidBody
    })?;

    let account = service.create_account(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            message: "Account created successfully".to_string(),
            account,
        }),
    ))
}
