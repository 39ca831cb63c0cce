//! MongoDB implementation of AccountRepository

use async_trait::async_trait;
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::AccountResult;
use crate::models::Account;
use crate::repository::AccountRepository;

pub struct MongoAccountRepository {
    collection: Collection<Account>,
}

impl MongoAccountRepository {
    /// Repository over the `accounts` collection of `db`
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, "accounts")
    }

    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Account>(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl AccountRepository for MongoAccountRepository {
    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn create(&self, account: Account) -> AccountResult<Account> {
        self.collection.insert_one(&account).await?;

        tracing::info!(account_id = %account.id, "Account created successfully");
        Ok(account)
    }
}
