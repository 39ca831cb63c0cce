//! Login route

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = UserService::new(MongoUserRepository::new(state.db.clone()));
    handlers::auth_router(service, state.jwt.clone())
}
