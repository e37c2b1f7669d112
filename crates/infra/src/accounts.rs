//! Account management service.

use tracing::instrument;

use ledgerd_core::{LedgerError, LedgerResult, Money};
use ledgerd_ledger::{Account, AccountDraft, AccountId};

use crate::engine::store_error;
use crate::store::{LedgerStore, LedgerUnitOfWork, StoreError};

#[derive(Debug, Clone)]
pub struct AccountService<S> {
    store: S,
}

impl<S: LedgerStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an account with an optional opening balance (default zero).
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: AccountDraft) -> LedgerResult<Account> {
        let balance = Money::new(draft.balance.unwrap_or(0))?;
        let id = draft.id.unwrap_or_else(AccountId::generate);

        let mut uow = self.store.begin().await.map_err(store_error)?;
        if uow.account_by_id(&id).await.map_err(store_error)?.is_some() {
            return Err(LedgerError::AccountExists(id.as_str().to_string()));
        }

        let account = Account {
            id: id.clone(),
            name: draft.name,
            direction: draft.direction,
            balance: balance.amount(),
        };
        uow.insert_account(&account).await.map_err(|err| {
            // A racing creator loses with a unique violation instead of
            // failing the pre-check.
            match err {
                StoreError::UniqueViolation { ref constraint, .. }
                    if constraint.contains("accounts") =>
                {
                    LedgerError::AccountExists(id.as_str().to_string())
                }
                other => store_error(other),
            }
        })?;
        uow.commit().await.map_err(store_error)?;

        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    pub async fn get(&self, id: &AccountId) -> LedgerResult<Account> {
        let mut uow = self.store.begin().await.map_err(store_error)?;
        uow.account_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| LedgerError::AccountNotFound(id.as_str().to_string()))
    }

    pub async fn list(&self) -> LedgerResult<Vec<Account>> {
        let mut uow = self.store.begin().await.map_err(store_error)?;
        uow.all_accounts().await.map_err(store_error)
    }
}
