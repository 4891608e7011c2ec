use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::{DayOverflow, FinancialEvent};

/// Signed cash effect of a bill or income on `date`.
///
/// Zero outside the event's active window and on non-occurrence dates. One-time
/// events return their stored amount on the start date; recurring events run the
/// base amount through their change schedule.
pub fn effective_amount(event: &FinancialEvent, date: NaiveDate) -> Decimal {
    event.effective_amount(date, DayOverflow::Skip)
}
