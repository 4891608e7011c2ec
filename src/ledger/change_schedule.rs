use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::frequency::{DayOverflow, Frequency};
use crate::errors::{ForecastError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Bonus,
    Raise,
}

/// One modifier applied to an entity's base amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeScheduleEntry {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub amount: Decimal,
    pub is_percentage: bool,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
}

impl ChangeScheduleEntry {
    pub fn bonus(amount: Decimal, start_date: NaiveDate) -> Self {
        Self {
            kind: ChangeKind::Bonus,
            amount,
            is_percentage: false,
            start_date,
            end_date: None,
            frequency: None,
        }
    }

    /// A multiplicative raise, e.g. `1.05` for +5%.
    pub fn raise(rate: Decimal, start_date: NaiveDate) -> Self {
        Self {
            kind: ChangeKind::Raise,
            amount: rate,
            is_percentage: true,
            start_date,
            end_date: None,
            frequency: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn every(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ForecastError::InvalidSchedule(format!(
                    "change starting {} ends before it starts ({})",
                    self.start_date, end
                )));
            }
        }
        if let Some(frequency) = &self.frequency {
            frequency.validate()?;
        }
        Ok(())
    }

    /// Whether this entry modifies the amount on `date`.
    pub fn fires_on(&self, date: NaiveDate, overflow: DayOverflow) -> bool {
        if date < self.start_date {
            return false;
        }
        if matches!(self.end_date, Some(end) if date > end) {
            return false;
        }
        // Without a frequency the entry is in force on every date of its window.
        self.frequency
            .map_or(true, |frequency| frequency.meets_with(date, self.start_date, overflow))
    }

    fn apply(&self, amount: Decimal) -> Decimal {
        if self.is_percentage {
            amount * self.amount
        } else {
            amount + self.amount
        }
    }
}

/// Applies every entry firing on `date` to `base_amount`, in stored order.
///
/// Entries compound: each one sees the running total left by the previous ones.
pub fn apply_changes(base_amount: Decimal, schedule: &[ChangeScheduleEntry], date: NaiveDate) -> Decimal {
    apply_changes_with(base_amount, schedule, date, DayOverflow::Skip)
}

pub fn apply_changes_with(
    base_amount: Decimal,
    schedule: &[ChangeScheduleEntry],
    date: NaiveDate,
    overflow: DayOverflow,
) -> Decimal {
    schedule
        .iter()
        .filter(|entry| entry.fires_on(date, overflow))
        .fold(base_amount, |amount, entry| entry.apply(amount))
}
