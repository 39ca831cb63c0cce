//! Extractors that turn bad input into [`AppError`](crate::errors::AppError)
//! responses instead of axum's plain-text rejections.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
