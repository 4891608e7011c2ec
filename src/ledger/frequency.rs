use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::calendar::{days_in_month, month_index_delta};
use crate::errors::{ForecastError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// How month- and year-based schedules treat an anchor day the target month lacks,
/// such as the 31st in a 30-day month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayOverflow {
    /// The occurrence does not happen that month.
    #[default]
    Skip,
    /// The occurrence falls on the last day of the shorter month.
    Clamp,
}

/// A repeat interval anchored to an entity's start date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Frequency {
    pub unit: FrequencyUnit,
    pub value: u32,
}

impl Frequency {
    pub fn new(unit: FrequencyUnit, value: u32) -> Result<Self> {
        let frequency = Self { unit, value };
        frequency.validate()?;
        Ok(frequency)
    }

    pub fn days(value: u32) -> Self {
        Self {
            unit: FrequencyUnit::Days,
            value,
        }
    }

    pub fn weeks(value: u32) -> Self {
        Self {
            unit: FrequencyUnit::Weeks,
            value,
        }
    }

    pub fn months(value: u32) -> Self {
        Self {
            unit: FrequencyUnit::Months,
            value,
        }
    }

    pub fn years(value: u32) -> Self {
        Self {
            unit: FrequencyUnit::Years,
            value,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.value == 0 {
            return Err(ForecastError::InvalidSchedule(
                "frequency value must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether `date` is an occurrence of a schedule anchored at `start`.
    pub fn meets(&self, date: NaiveDate, start: NaiveDate) -> bool {
        self.meets_with(date, start, DayOverflow::Skip)
    }

    pub fn meets_with(&self, date: NaiveDate, start: NaiveDate, overflow: DayOverflow) -> bool {
        if date < start || self.value == 0 {
            return false;
        }
        let value = i64::from(self.value);
        match self.unit {
            FrequencyUnit::Days => (date - start).num_days() % value == 0,
            FrequencyUnit::Weeks => (date - start).num_days() % (value * 7) == 0,
            FrequencyUnit::Months => {
                day_of_month_matches(date, start.day(), overflow)
                    && i64::from(month_index_delta(start, date)) % value == 0
            }
            FrequencyUnit::Years => {
                date.month() == start.month()
                    && day_of_month_matches(date, start.day(), overflow)
                    && i64::from(date.year() - start.year()) % value == 0
            }
        }
    }

    /// The next scheduled date after `from`, assuming `from` is an occurrence.
    ///
    /// Month steps clamp the day to the target month's length. `None` once the
    /// step leaves the representable calendar.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        let value = u64::from(self.value);
        match self.unit {
            FrequencyUnit::Days => from.checked_add_days(Days::new(value)),
            FrequencyUnit::Weeks => from.checked_add_days(Days::new(value * 7)),
            FrequencyUnit::Months => from.checked_add_months(Months::new(self.value)),
            FrequencyUnit::Years => self
                .value
                .checked_mul(12)
                .and_then(|months| from.checked_add_months(Months::new(months))),
        }
    }

    pub fn label(&self) -> String {
        match (self.value, self.unit) {
            (1, FrequencyUnit::Days) => "Daily".into(),
            (1, FrequencyUnit::Weeks) => "Weekly".into(),
            (1, FrequencyUnit::Months) => "Monthly".into(),
            (1, FrequencyUnit::Years) => "Yearly".into(),
            (n, unit) => {
                let noun = match unit {
                    FrequencyUnit::Days => "days",
                    FrequencyUnit::Weeks => "weeks",
                    FrequencyUnit::Months => "months",
                    FrequencyUnit::Years => "years",
                };
                format!("Every {} {}", n, noun)
            }
        }
    }
}

/// Pure predicate form of [`Frequency::meets`].
pub fn meets_frequency(date: NaiveDate, start_date: NaiveDate, frequency: &Frequency) -> bool {
    frequency.meets(date, start_date)
}

fn day_of_month_matches(date: NaiveDate, anchor_day: u32, overflow: DayOverflow) -> bool {
    match overflow {
        DayOverflow::Skip => date.day() == anchor_day,
        DayOverflow::Clamp => {
            date.day() == anchor_day.min(days_in_month(date.year(), date.month()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn monthly_alignment_matches_anchor_day() {
        let start = d(2024, 1, 10);
        let monthly = Frequency::months(1);
        assert!(monthly.meets(d(2024, 2, 10), start));
        assert!(!monthly.meets(d(2024, 2, 11), start));
        assert!(monthly.meets(d(2024, 3, 10), start));
        assert!(monthly.meets(start, start));
        assert!(!monthly.meets(d(2023, 12, 10), start));
    }

    #[test]
    fn multi_month_alignment_counts_across_years() {
        let start = d(2024, 1, 5);
        let every_five = Frequency::months(5);
        assert!(every_five.meets(d(2024, 6, 5), start));
        assert!(every_five.meets(d(2025, 4, 5), start));
        assert!(!every_five.meets(d(2025, 1, 5), start));
    }

    #[test]
    fn day_and_week_alignment() {
        let start = d(2024, 1, 1);
        assert!(Frequency::days(3).meets(d(2024, 1, 7), start));
        assert!(!Frequency::days(3).meets(d(2024, 1, 8), start));
        assert!(Frequency::weeks(2).meets(d(2024, 1, 15), start));
        assert!(!Frequency::weeks(2).meets(d(2024, 1, 8), start));
    }

    #[test]
    fn yearly_alignment() {
        let start = d(2020, 3, 15);
        assert!(Frequency::years(1).meets(d(2023, 3, 15), start));
        assert!(!Frequency::years(2).meets(d(2023, 3, 15), start));
        assert!(Frequency::years(2).meets(d(2024, 3, 15), start));
        assert!(!Frequency::years(1).meets(d(2023, 4, 15), start));
    }

    #[test]
    fn day_overflow_skips_by_default_and_clamps_on_request() {
        let start = d(2024, 1, 31);
        let monthly = Frequency::months(1);
        assert!(!monthly.meets(d(2024, 4, 30), start));
        assert!(monthly.meets_with(d(2024, 4, 30), start, DayOverflow::Clamp));
        assert!(monthly.meets_with(d(2024, 2, 29), start, DayOverflow::Clamp));
        assert!(!monthly.meets_with(d(2024, 2, 28), start, DayOverflow::Clamp));

        let leap = d(2024, 2, 29);
        assert!(!Frequency::years(1).meets(d(2025, 2, 28), leap));
        assert!(Frequency::years(1).meets_with(d(2025, 2, 28), leap, DayOverflow::Clamp));
    }

    #[test]
    fn next_date_reports_overflow_instead_of_wrapping() {
        let start = d(2024, 1, 1);
        assert_eq!(Frequency::years(u32::MAX).next_date(start), None);
        assert_eq!(Frequency::months(u32::MAX).next_date(start), None);
        assert_eq!(Frequency::years(u32::MAX / 12 + 1).next_date(start), None);
        assert_eq!(Frequency::days(u32::MAX).next_date(start), None);
    }

    #[test]
    fn zero_value_is_rejected() {
        assert!(Frequency::new(FrequencyUnit::Days, 0).is_err());
        assert!(!Frequency::days(0).meets(d(2024, 1, 1), d(2024, 1, 1)));
    }

    #[test]
    fn next_date_and_label() {
        assert_eq!(Frequency::months(1).next_date(d(2024, 1, 31)), Some(d(2024, 2, 29)));
        assert_eq!(Frequency::weeks(2).next_date(d(2024, 1, 1)), Some(d(2024, 1, 15)));
        assert_eq!(Frequency::years(1).next_date(d(2024, 2, 29)), Some(d(2025, 2, 28)));
        assert_eq!(Frequency::months(1).label(), "Monthly");
        assert_eq!(Frequency::weeks(2).label(), "Every 2 weeks");
    }
}
