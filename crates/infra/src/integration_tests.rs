//! End-to-end service tests over the in-memory store.

use ledgerd_core::LedgerError;
use ledgerd_ledger::{
    AccountDraft, AccountId, Direction, EntryDraft, IdempotencyKey, TransactionDraft,
    TransactionId,
};

use crate::{AccountService, InMemoryLedgerStore, TransactionEngine};

fn services() -> (
    TransactionEngine<InMemoryLedgerStore>,
    AccountService<InMemoryLedgerStore>,
) {
    let store = InMemoryLedgerStore::new();
    (
        TransactionEngine::new(store.clone()),
        AccountService::new(store),
    )
}

async fn seed_account(
    accounts: &AccountService<InMemoryLedgerStore>,
    id: &str,
    direction: Direction,
    balance: i64,
) {
    accounts
        .create(AccountDraft {
            id: Some(AccountId::from(id)),
            name: Some(id.to_string()),
            direction,
            balance: Some(balance),
        })
        .await
        .unwrap();
}

fn entry(account: &str, direction: Direction, amount: i64) -> EntryDraft {
    EntryDraft {
        id: None,
        account_id: AccountId::from(account),
        direction,
        amount,
    }
}

fn draft(id: Option<&str>, entries: Vec<EntryDraft>) -> TransactionDraft {
    TransactionDraft {
        id: id.map(TransactionId::from),
        name: Some("test posting".to_string()),
        entries,
    }
}

async fn balance_of(accounts: &AccountService<InMemoryLedgerStore>, id: &str) -> i64 {
    accounts.get(&AccountId::from(id)).await.unwrap().balance
}

#[tokio::test]
async fn balanced_posting_updates_both_balances() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;

    let posted = engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Debit, 100),
                    entry("revenue", Direction::Credit, 100),
                ],
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(posted.entries.len(), 2);
    assert_eq!(balance_of(&accounts, "cash").await, 100);
    assert_eq!(balance_of(&accounts, "revenue").await, 100);
}

#[tokio::test]
async fn posting_against_natural_direction_goes_negative() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;

    // Both entries run against their account's natural side, so both
    // balances drop below zero (overdraft is permitted).
    engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Credit, 100),
                    entry("revenue", Direction::Debit, 100),
                ],
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(balance_of(&accounts, "cash").await, -100);
    assert_eq!(balance_of(&accounts, "revenue").await, -100);
}

#[tokio::test]
async fn unbalanced_posting_leaves_no_trace() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 10).await;
    seed_account(&accounts, "revenue", Direction::Credit, 10).await;

    let err = engine
        .create(
            draft(
                Some("tx-unbalanced"),
                vec![
                    entry("cash", Direction::Debit, 100),
                    entry("revenue", Direction::Credit, 99),
                ],
            ),
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err, LedgerError::UnbalancedTransaction);
    assert_eq!(balance_of(&accounts, "cash").await, 10);
    assert_eq!(balance_of(&accounts, "revenue").await, 10);
    assert!(matches!(
        engine.get(&TransactionId::from("tx-unbalanced")).await,
        Err(LedgerError::TransactionNotFound(_))
    ));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;

    let err = engine
        .create(draft(None, vec![entry("cash", Direction::Debit, 0)]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    let err = engine
        .create(draft(None, vec![]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn posting_to_unknown_account_is_rejected() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;

    let err = engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Debit, 100),
                    entry("ghost", Direction::Credit, 100),
                ],
            ),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::MissingAccount("ghost".to_string()));
}

#[tokio::test]
async fn duplicate_transaction_id_is_rejected_without_side_effects() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;
    let lines = vec![
        entry("cash", Direction::Debit, 100),
        entry("revenue", Direction::Credit, 100),
    ];

    engine
        .create(draft(Some("tx-1"), lines.clone()), None)
        .await
        .unwrap();
    let err = engine
        .create(draft(Some("tx-1"), lines), None)
        .await
        .unwrap_err();

    assert_eq!(err, LedgerError::DuplicateTransaction);
    assert_eq!(balance_of(&accounts, "cash").await, 100);
}

#[tokio::test]
async fn idempotent_replay_returns_original_posting_once() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;
    let request = draft(
        Some("tx-rent"),
        vec![
            entry("cash", Direction::Debit, 100),
            entry("revenue", Direction::Credit, 100),
        ],
    );
    let key = IdempotencyKey::from("key-1");

    let first = engine
        .create(request.clone(), Some(key.clone()))
        .await
        .unwrap();
    let second = engine.create(request, Some(key)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(balance_of(&accounts, "cash").await, 100);
}

#[tokio::test]
async fn same_key_with_different_request_conflicts() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;
    let key = IdempotencyKey::from("key-1");

    engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Debit, 100),
                    entry("revenue", Direction::Credit, 100),
                ],
            ),
            Some(key.clone()),
        )
        .await
        .unwrap();

    let err = engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Debit, 200),
                    entry("revenue", Direction::Credit, 200),
                ],
            ),
            Some(key),
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::IdempotencyConflict);
    assert_eq!(balance_of(&accounts, "cash").await, 100);
}

#[tokio::test]
async fn deltas_compose_when_entries_share_an_account() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;

    engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Debit, 100),
                    entry("cash", Direction::Credit, 40),
                    entry("revenue", Direction::Credit, 60),
                ],
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(balance_of(&accounts, "cash").await, 60);
    assert_eq!(balance_of(&accounts, "revenue").await, 60);
}

#[tokio::test]
async fn projection_overflow_fails_the_whole_posting() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, i64::MAX).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;

    let err = engine
        .create(
            draft(
                None,
                vec![
                    entry("cash", Direction::Debit, 1),
                    entry("revenue", Direction::Credit, 1),
                ],
            ),
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err, LedgerError::ArithmeticOverflow);
    assert_eq!(balance_of(&accounts, "cash").await, i64::MAX);
    assert_eq!(balance_of(&accounts, "revenue").await, 0);
}

#[tokio::test]
async fn entries_come_back_in_posting_order() {
    let (engine, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 0).await;
    seed_account(&accounts, "bank", Direction::Debit, 0).await;
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;

    let posted = engine
        .create(
            draft(
                Some("tx-ordered"),
                vec![
                    entry("cash", Direction::Debit, 30),
                    entry("bank", Direction::Debit, 70),
                    entry("revenue", Direction::Credit, 100),
                ],
            ),
            None,
        )
        .await
        .unwrap();

    let fetched = engine
        .get(&TransactionId::from("tx-ordered"))
        .await
        .unwrap();
    assert_eq!(fetched, posted);
    let accounts_in_order: Vec<_> = fetched
        .entries
        .iter()
        .map(|e| e.account_id.as_str().to_string())
        .collect();
    assert_eq!(accounts_in_order, ["cash", "bank", "revenue"]);
}

#[tokio::test]
async fn account_creation_is_unique_and_validated() {
    let (_, accounts) = services();
    seed_account(&accounts, "cash", Direction::Debit, 25).await;

    let err = accounts
        .create(AccountDraft {
            id: Some(AccountId::from("cash")),
            name: None,
            direction: Direction::Debit,
            balance: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::AccountExists("cash".to_string()));

    let err = accounts
        .create(AccountDraft {
            id: None,
            name: None,
            direction: Direction::Credit,
            balance: Some(-1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    assert!(matches!(
        accounts.get(&AccountId::from("ghost")).await,
        Err(LedgerError::AccountNotFound(_))
    ));
}

#[tokio::test]
async fn listing_returns_accounts_sorted_by_id() {
    let (_, accounts) = services();
    seed_account(&accounts, "revenue", Direction::Credit, 0).await;
    seed_account(&accounts, "cash", Direction::Debit, 0).await;

    let all = accounts.list().await.unwrap();
    let ids: Vec<_> = all.iter().map(|a| a.id.as_str().to_string()).collect();
    assert_eq!(ids, ["cash", "revenue"]);
}
