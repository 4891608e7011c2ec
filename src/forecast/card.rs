//! Outstanding balance of a credit account on a date.
//!
//! Only the account's own bills and the *dates* of payoff transfers into it are
//! consulted; payoff amounts are never resolved here, which keeps the
//! transfer/card pair from recursing.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::book::AccountBook;
use crate::{config::ProjectionConfig, ledger::DateRange};

/// Card balance on `target`, including bills falling on `target` itself.
pub fn card_balance(book: &AccountBook, target: NaiveDate, config: &ProjectionConfig) -> Decimal {
    let (mut seed_date, mut seed_amount) = match book.balance_on_or_before(target) {
        Some(snapshot) => (snapshot.date, snapshot.amount),
        None => match book.bills().map(|bill| bill.start_date).min() {
            // With no snapshot the card starts empty the day before its first charge.
            Some(first_charge) => (first_charge - Duration::days(1), Decimal::ZERO),
            None => return Decimal::ZERO,
        },
    };

    if let Some(paid_off) = last_payoff_between(book, seed_date, target, config) {
        tracing::debug!(account = %book.id(), %paid_off, "card balance reset by payoff");
        seed_date = paid_off;
        seed_amount = Decimal::ZERO;
    }

    let overflow = config.day_overflow;
    let charges: Decimal = DateRange::new(seed_date + Duration::days(1), target)
        .flat_map(|date| book.bills().map(move |bill| bill.effective_amount(date, overflow)))
        .sum();

    seed_amount + charges
}

/// Latest payoff occurrence strictly between `after` and `before`.
///
/// The search walks forward and gives up once `payoff_search_limit` consecutive
/// days pass without an occurrence, keeping whatever it found before that.
fn last_payoff_between(
    book: &AccountBook,
    after: NaiveDate,
    before: NaiveDate,
    config: &ProjectionConfig,
) -> Option<NaiveDate> {
    let payoffs: Vec<_> = book
        .incoming_transfers()
        .filter(|transfer| transfer.payoff_balance)
        .collect();
    if payoffs.is_empty() {
        return None;
    }

    let mut found = None;
    let mut since_found = 0usize;
    for date in DateRange::new(after + Duration::days(1), before - Duration::days(1)) {
        if since_found >= config.payoff_search_limit {
            if found.is_none() {
                tracing::warn!(
                    account = %book.id(),
                    %after,
                    %before,
                    limit = config.payoff_search_limit,
                    "payoff search exceeded its limit; ignoring payoffs"
                );
            }
            break;
        }
        if payoffs
            .iter()
            .any(|transfer| transfer.occurs_on(date, config.day_overflow))
        {
            found = Some(date);
            since_found = 0;
        } else {
            since_found += 1;
        }
    }
    found
}
