//! Posting direction (the two sides of a double entry).

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use ledgerd_core::LedgerError;

/// The side of an entry, and the "natural" side of an account.
///
/// A closed two-variant type; parsing rejects everything outside
/// `{debit, credit}` so no default case exists anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }
}

impl FromStr for Direction {
    type Err = LedgerError;

    /// The canonical parse (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debit" => Ok(Direction::Debit),
            "credit" => Ok(Direction::Credit),
            other => Err(LedgerError::validation(format!("invalid direction: {other}"))),
        }
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_spellings() {
        assert_eq!("debit".parse::<Direction>().unwrap(), Direction::Debit);
        assert_eq!("credit".parse::<Direction>().unwrap(), Direction::Credit);
        assert_eq!("DEBIT".parse::<Direction>().unwrap(), Direction::Debit);
    }

    #[test]
    fn rejects_anything_else() {
        assert!(matches!(
            "debits".parse::<Direction>(),
            Err(LedgerError::Validation(_))
        ));
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Direction::Credit).unwrap(),
            "\"credit\""
        );
        let parsed: Direction = serde_json::from_str("\"debit\"").unwrap();
        assert_eq!(parsed, Direction::Debit);
    }
}
