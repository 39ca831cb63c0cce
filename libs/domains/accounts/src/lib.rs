//! Banking accounts domain: a single validated create operation backed by
//! MongoDB.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{AccountError, AccountResult};
pub use handlers::ApiDoc;
pub use models::{Account, CreateAccount, CreateAccountResponse};
pub use self::mongodb::MongoAccountRepository;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use service::AccountService;
