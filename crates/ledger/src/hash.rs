//! Canonical request hashing for idempotency-key replay detection.
//!
//! A request is reduced to a canonical byte string and digested with
//! SHA-256. Each field is written length-prefixed (`{len}:{bytes};`) so
//! field content can never shift field boundaries. Entry order is
//! significant: reordering entries yields a different digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::TransactionDraft;

/// Lowercase hex SHA-256 digest of a canonicalized transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestHash(String);

impl RequestHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RequestHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for RequestHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

fn push_field(buf: &mut Vec<u8>, field: &str) {
    buf.extend_from_slice(field.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(field.as_bytes());
    buf.push(b';');
}

/// Compute the canonical hash of a transaction draft.
///
/// Absent optional fields hash as empty strings, so a request with an
/// explicit empty id and one with no id are deliberately equivalent.
pub fn request_hash(draft: &TransactionDraft) -> RequestHash {
    let mut buf = Vec::new();
    push_field(&mut buf, draft.id.as_ref().map_or("", |id| id.as_str()));
    push_field(&mut buf, draft.name.as_deref().unwrap_or(""));
    for entry in &draft.entries {
        push_field(&mut buf, entry.id.as_ref().map_or("", |id| id.as_str()));
        push_field(&mut buf, entry.account_id.as_str());
        push_field(&mut buf, entry.direction.as_str());
        push_field(&mut buf, &entry.amount.to_string());
    }
    RequestHash(hex::encode(Sha256::digest(&buf)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::model::{AccountId, EntryDraft, TransactionId};

    fn draft(entries: Vec<EntryDraft>) -> TransactionDraft {
        TransactionDraft {
            id: Some(TransactionId::from("tx-1")),
            name: Some("rent".to_string()),
            entries,
        }
    }

    fn entry(account: &str, direction: Direction, amount: i64) -> EntryDraft {
        EntryDraft {
            id: None,
            account_id: AccountId::from(account),
            direction,
            amount,
        }
    }

    #[test]
    fn digest_is_deterministic_hex() {
        let d = draft(vec![
            entry("cash", Direction::Debit, 100),
            entry("revenue", Direction::Credit, 100),
        ]);
        let a = request_hash(&d);
        let b = request_hash(&d);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn amount_changes_the_digest() {
        let a = request_hash(&draft(vec![entry("cash", Direction::Debit, 100)]));
        let b = request_hash(&draft(vec![entry("cash", Direction::Debit, 101)]));
        assert_ne!(a, b);
    }

    #[test]
    fn entry_order_changes_the_digest() {
        let e1 = entry("cash", Direction::Debit, 100);
        let e2 = entry("revenue", Direction::Credit, 100);
        let a = request_hash(&draft(vec![e1.clone(), e2.clone()]));
        let b = request_hash(&draft(vec![e2, e1]));
        assert_ne!(a, b);
    }

    #[test]
    fn field_content_cannot_shift_boundaries() {
        // "ab"+"c" must not collide with "a"+"bc" once length-prefixed.
        let a = request_hash(&TransactionDraft {
            id: Some(TransactionId::from("ab")),
            name: Some("c".to_string()),
            entries: vec![],
        });
        let b = request_hash(&TransactionDraft {
            id: Some(TransactionId::from("a")),
            name: Some("bc".to_string()),
            entries: vec![],
        });
        assert_ne!(a, b);
    }

    #[test]
    fn absent_ids_hash_as_empty_strings() {
        let a = request_hash(&TransactionDraft {
            id: None,
            name: None,
            entries: vec![],
        });
        let b = request_hash(&TransactionDraft {
            id: Some(TransactionId::from("")),
            name: Some(String::new()),
            entries: vec![],
        });
        assert_eq!(a, b);
    }
}
