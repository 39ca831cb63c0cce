//! MongoDB connection management
//!
//! The [`Client`] returned here owns the connection pool. Create it once at
//! startup, clone it into whatever needs it, and call `Client::shutdown` on
//! the way out.

mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
