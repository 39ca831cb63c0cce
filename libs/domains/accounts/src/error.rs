use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const NIM_MUST_BE_EVEN: &str = "NIM must be even";

#[derive(Debug, Error)]
pub enum AccountError {
    /// A required field is missing, empty or zero, or the body is not JSON
    #[error("Invalid request body")]
    InvalidBody,

    #[error("NIM must be even")]
    OddNim,

    #[error("Database error: {0}")]
    Database(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidBody => AppError::BadRequest(INVALID_REQUEST_BODY.to_string()),
            AccountError::OddNim => AppError::BadRequest(NIM_MUST_BE_EVEN.to_string()),
            AccountError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<mongodb::error::Error> for AccountError {
    fn from(err: mongodb::error::Error) -> Self {
        AccountError::Database(err.to_string())
    }
}
