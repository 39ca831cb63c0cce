//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

use crate::config::Config;

/// Cloned into each router; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Owns the connection pool; shut down on exit
    pub mongo_client: Client,
    pub db: Database,
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client, db: Database) -> Self {
        let jwt = JwtAuth::new(&config.jwt);
        Self {
            config,
            mongo_client,
            db,
            jwt,
        }
    }
}
