use std::sync::Arc;
use tracing::instrument;

use crate::error::AccountResult;
use crate::models::{Account, CreateAccount};
use crate::repository::AccountRepository;

pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> Clone for AccountService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate the body and store the account; nothing is written on a 400
    #[instrument(skip(self, input))]
    pub async fn create_account(&self, input: CreateAccount) -> AccountResult<Account> {
        let account = input.into_account()?;
        self.repository.create(account).await
    }
}
