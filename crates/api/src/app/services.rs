//! Service container: one set of application services per backend.
//!
//! The store choice is made once at startup, so the handlers stay free
//! of generics and the enum dispatches to the concrete backend.

use sqlx::postgres::PgPool;

use ledgerd_core::LedgerResult;
use ledgerd_infra::{
    AccountService, InMemoryLedgerStore, PgLedgerStore, TransactionEngine,
};
use ledgerd_ledger::{
    Account, AccountDraft, AccountId, IdempotencyKey, Transaction, TransactionDraft, TransactionId,
};

pub enum AppServices {
    InMemory {
        engine: TransactionEngine<InMemoryLedgerStore>,
        accounts: AccountService<InMemoryLedgerStore>,
    },
    Postgres {
        engine: TransactionEngine<PgLedgerStore>,
        accounts: AccountService<PgLedgerStore>,
    },
}

impl AppServices {
    pub fn in_memory() -> Self {
        let store = InMemoryLedgerStore::new();
        Self::InMemory {
            engine: TransactionEngine::new(store.clone()),
            accounts: AccountService::new(store),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = PgLedgerStore::new(pool);
        Self::Postgres {
            engine: TransactionEngine::new(store.clone()),
            accounts: AccountService::new(store),
        }
    }

    pub async fn create_transaction(
        &self,
        draft: TransactionDraft,
        key: Option<IdempotencyKey>,
    ) -> LedgerResult<Transaction> {
        match self {
            Self::InMemory { engine, .. } => engine.create(draft, key).await,
            Self::Postgres { engine, .. } => engine.create(draft, key).await,
        }
    }

    pub async fn get_transaction(&self, id: &TransactionId) -> LedgerResult<Transaction> {
        match self {
            Self::InMemory { engine, .. } => engine.get(id).await,
            Self::Postgres { engine, .. } => engine.get(id).await,
        }
    }

    pub async fn create_account(&self, draft: AccountDraft) -> LedgerResult<Account> {
        match self {
            Self::InMemory { accounts, .. } => accounts.create(draft).await,
            Self::Postgres { accounts, .. } => accounts.create(draft).await,
        }
    }

    pub async fn get_account(&self, id: &AccountId) -> LedgerResult<Account> {
        match self {
            Self::InMemory { accounts, .. } => accounts.get(id).await,
            Self::Postgres { accounts, .. } => accounts.get(id).await,
        }
    }

    pub async fn list_accounts(&self) -> LedgerResult<Vec<Account>> {
        match self {
            Self::InMemory { accounts, .. } => accounts.list().await,
            Self::Postgres { accounts, .. } => accounts.list().await,
        }
    }
}

/// Build services from the environment: `DATABASE_URL` selects Postgres
/// (creating the schema on the way up), otherwise the in-memory store.
pub async fn build_services() -> anyhow::Result<AppServices> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPool::connect(&url).await?;
            let store = PgLedgerStore::new(pool.clone());
            store.init_schema().await?;
            tracing::info!("using postgres store");
            Ok(AppServices::postgres(pool))
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Ok(AppServices::in_memory())
        }
    }
}
