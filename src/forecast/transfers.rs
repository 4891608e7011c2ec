use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::{DayOverflow, Transfer};

/// Signed effect of `transfer` on `account_id` for `date`.
///
/// On an occurrence the transfer resolves to its stored amount, or for payoff
/// transfers to the destination card balance (supplied lazily by `card_balance`,
/// so it is only computed when the transfer actually occurs). That value is
/// negated for the destination account and kept as is for the source. Accounts
/// on neither side see zero.
pub fn resolve_transfer<F>(
    transfer: &Transfer,
    date: NaiveDate,
    account_id: Uuid,
    overflow: DayOverflow,
    card_balance: F,
) -> Decimal
where
    F: FnOnce(NaiveDate) -> Decimal,
{
    if !transfer.involves(account_id) || !transfer.occurs_on(date, overflow) {
        return Decimal::ZERO;
    }

    let scalar = if account_id == transfer.to_account_id {
        Decimal::NEGATIVE_ONE
    } else {
        Decimal::ONE
    };
    let resolved = if transfer.payoff_balance {
        card_balance(date)
    } else {
        transfer.amount
    };
    resolved * scalar
}
