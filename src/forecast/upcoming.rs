//! Scheduled activity listed item by item over a short horizon.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::DateWindow;

/// Days after today covered by [`upcoming_window`].
pub const DEFAULT_UPCOMING_DAYS: i64 = 14;

/// Which scheduled entity produced an [`UpcomingItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum UpcomingSource {
    Event(Uuid),
    Transfer(Uuid),
}

/// One non-zero scheduled effect on an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingItem {
    pub name: String,
    /// Signed the same way the projection applies it.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub source: UpcomingSource,
}

/// `today` through `today + 14 days`, the horizon callers default to.
pub fn upcoming_window(today: NaiveDate) -> DateWindow {
    DateWindow {
        start: today,
        end: today + Duration::days(DEFAULT_UPCOMING_DAYS),
    }
}
