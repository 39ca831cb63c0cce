//! Banking accounts API routes

use axum::Router;
use domain_accounts::{AccountService, MongoAccountRepository, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoAccountRepository::new(state.db.clone());
    handlers::router(AccountService::new(repository))
}
