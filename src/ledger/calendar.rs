//! Calendar helpers: inclusive date ranges, windows, and period boundaries.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Iterates every date from `start` through `end`, both inclusive.
///
/// An `end` before `start` yields nothing.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|next| *next <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => ((self.end - next).num_days() + 1) as usize,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateRange {}

/// Shorthand for [`DateRange::new`].
pub fn date_range(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange::new(start, end)
}

/// An inclusive span of calendar dates used to scope storage queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end < start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Window covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must not precede start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 31,
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    date + Duration::days(i64::from(last - date.day()))
}

/// First day of the calendar quarter containing `date`.
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let offset = date.month0() % 3;
    let mut start = month_start(date);
    for _ in 0..offset {
        start = month_start(start - Duration::days(1));
    }
    start
}

/// Last day of the calendar quarter containing `date`.
pub fn quarter_end(date: NaiveDate) -> NaiveDate {
    let remaining = 2 - date.month0() % 3;
    let mut end = month_end(date);
    for _ in 0..remaining {
        end = month_end(end + Duration::days(1));
    }
    end
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

pub fn year_end(date: NaiveDate) -> NaiveDate {
    let mut end = date;
    while let Some(next) = end.succ_opt().filter(|next| next.year() == date.year()) {
        end = next;
    }
    end
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Number of whole months between the month of `from` and the month of `to`.
pub(crate) fn month_index_delta(from: NaiveDate, to: NaiveDate) -> i32 {
    let from_idx = from.year() * 12 + from.month0() as i32;
    let to_idx = to.year() * 12 + to.month0() as i32;
    to_idx - from_idx
}
