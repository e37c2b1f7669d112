//! Double-entry balance validation.

use ledgerd_core::LedgerError;

use crate::direction::Direction;

/// Validate the fundamental double-entry invariant: every amount is
/// strictly positive and debits equal credits in total.
///
/// Totals are accumulated with checked arithmetic so a request cannot
/// smuggle an overflow past validation.
pub fn validate_balanced<I>(lines: I) -> Result<(), LedgerError>
where
    I: IntoIterator<Item = (Direction, i64)>,
{
    let mut debits: i64 = 0;
    let mut credits: i64 = 0;

    for (direction, amount) in lines {
        if amount <= 0 {
            return Err(LedgerError::invalid_amount("amount must be positive"));
        }
        let side = match direction {
            Direction::Debit => &mut debits,
            Direction::Credit => &mut credits,
        };
        *side = side
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
    }

    if debits != credits {
        return Err(LedgerError::UnbalancedTransaction);
    }
    Ok(())
}
