//! Wire DTOs for the HTTP API (camelCase JSON).

use serde::{Deserialize, Serialize};

use ledgerd_core::LedgerResult;
use ledgerd_ledger::{
    Account, AccountDraft, AccountId, Entry, EntryDraft, EntryId, Transaction, TransactionDraft,
    TransactionId,
};

use super::errors::parse_direction;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub direction: String,
    pub balance: Option<i64>,
}

impl CreateAccountRequest {
    pub fn into_draft(self) -> LedgerResult<AccountDraft> {
        Ok(AccountDraft {
            id: self.id.map(AccountId::from),
            name: self.name,
            direction: parse_direction(&self.direction)?,
            balance: self.balance,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub entries: Vec<EntryRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub id: Option<String>,
    pub account_id: String,
    pub direction: String,
    pub amount: i64,
}

impl CreateTransactionRequest {
    pub fn into_draft(self) -> LedgerResult<TransactionDraft> {
        let entries = self
            .entries
            .into_iter()
            .map(|e| {
                Ok(EntryDraft {
                    id: e.id.map(EntryId::from),
                    account_id: AccountId::from(e.account_id),
                    direction: parse_direction(&e.direction)?,
                    amount: e.amount,
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;
        Ok(TransactionDraft {
            id: self.id.map(TransactionId::from),
            name: self.name,
            entries,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: Option<String>,
    pub direction: String,
    pub balance: i64,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name,
            direction: account.direction.as_str().to_string(),
            balance: account.balance,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub name: Option<String>,
    pub entries: Vec<EntryResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: String,
    pub transaction_id: String,
    pub account_id: String,
    pub direction: String,
    pub amount: i64,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.to_string(),
            transaction_id: entry.transaction_id.to_string(),
            account_id: entry.account_id.to_string(),
            direction: entry.direction.as_str().to_string(),
            amount: entry.amount,
        }
    }
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id.to_string(),
            name: transaction.name,
            entries: transaction.entries.into_iter().map(Into::into).collect(),
        }
    }
}
