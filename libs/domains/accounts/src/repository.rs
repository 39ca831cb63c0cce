use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AccountResult;
use crate::models::Account;

/// Repository trait for Account persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: Account) -> AccountResult<Account>;
}

/// In-memory implementation of AccountRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> AccountResult<Account> {
        self.accounts.write().await.push(account.clone());
        tracing::info!(account_id = %account.id, "Created account");
        Ok(account)
    }
}
