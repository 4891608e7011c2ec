use std::convert::TryFrom;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    calendar::DateWindow,
    change_schedule::{apply_changes_with, ChangeScheduleEntry},
    frequency::{DayOverflow, Frequency},
};
use crate::errors::{ForecastError, Result};

/// When a scheduled entity takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Exactly once, on the start date.
    OneTime,
    /// On every date aligned with the frequency, from the start date on.
    Recurring(Frequency),
}

impl Cadence {
    pub fn from_frequency(frequency: Option<Frequency>) -> Self {
        match frequency {
            Some(frequency) => Cadence::Recurring(frequency),
            None => Cadence::OneTime,
        }
    }

    pub fn frequency(&self) -> Option<Frequency> {
        match self {
            Cadence::OneTime => None,
            Cadence::Recurring(frequency) => Some(*frequency),
        }
    }

    /// Whether `date` is an occurrence for a schedule starting on `start`.
    pub fn occurs_on(&self, date: NaiveDate, start: NaiveDate, overflow: DayOverflow) -> bool {
        match self {
            Cadence::OneTime => date == start,
            Cadence::Recurring(frequency) => frequency.meets_with(date, start, overflow),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Bill,
    Income,
}

/// A bill or income owned by one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", into = "EventRecord")]
pub struct FinancialEvent {
    pub id: Uuid,
    pub name: String,
    pub account_id: Uuid,
    pub kind: EventKind,
    /// Signed effect on the owning account; bills are usually negative.
    pub amount: Decimal,
    pub cadence: Cadence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Applied in stored order; never re-sorted.
    pub change_schedule: Vec<ChangeScheduleEntry>,
}

impl FinancialEvent {
    pub fn new(
        kind: EventKind,
        name: impl Into<String>,
        account_id: Uuid,
        amount: Decimal,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            account_id,
            kind,
            amount,
            cadence,
            start_date,
            end_date: None,
            change_schedule: Vec::new(),
        }
    }

    pub fn bill(
        name: impl Into<String>,
        account_id: Uuid,
        amount: Decimal,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(EventKind::Bill, name, account_id, amount, cadence, start_date)
    }

    pub fn income(
        name: impl Into<String>,
        account_id: Uuid,
        amount: Decimal,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        Self::new(EventKind::Income, name, account_id, amount, cadence, start_date)
    }

    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_change(mut self, change: ChangeScheduleEntry) -> Self {
        self.change_schedule.push(change);
        self
    }

    pub fn is_bill(&self) -> bool {
        self.kind == EventKind::Bill
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ForecastError::InvalidSchedule(format!(
                    "{} `{}` ends ({}) before it starts ({})",
                    self.kind.label(),
                    self.name,
                    end,
                    self.start_date
                )));
            }
        }
        if let Cadence::Recurring(frequency) = &self.cadence {
            frequency.validate()?;
        }
        for change in &self.change_schedule {
            change.validate()?;
        }
        Ok(())
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    /// Signed cash effect of this event on `date`; zero on non-occurrence dates.
    pub fn effective_amount(&self, date: NaiveDate, overflow: DayOverflow) -> Decimal {
        if !self.is_active_on(date) {
            return Decimal::ZERO;
        }
        match self.cadence {
            Cadence::OneTime => {
                if date == self.start_date {
                    self.amount
                } else {
                    Decimal::ZERO
                }
            }
            Cadence::Recurring(frequency) => {
                if !frequency.meets_with(date, self.start_date, overflow) {
                    return Decimal::ZERO;
                }
                apply_changes_with(self.amount, &self.change_schedule, date, overflow)
            }
        }
    }

    /// Dates inside `window` on which this event occurs.
    pub fn occurrences(&self, window: DateWindow, overflow: DayOverflow) -> Vec<NaiveDate> {
        window
            .days()
            .filter(|date| self.is_active_on(*date))
            .filter(|date| self.cadence.occurs_on(*date, self.start_date, overflow))
            .collect()
    }
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Bill => "bill",
            EventKind::Income => "income",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    OneTime,
    Recurring,
}

/// Flat storage shape of a [`FinancialEvent`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub name: String,
    pub account_id: Uuid,
    pub kind: EventKind,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub change_schedule: Vec<ChangeScheduleEntry>,
}

impl TryFrom<EventRecord> for FinancialEvent {
    type Error = ForecastError;

    fn try_from(record: EventRecord) -> Result<Self> {
        let cadence = match (record.schedule_type, record.frequency) {
            (ScheduleType::Recurring, Some(frequency)) => Cadence::Recurring(frequency),
            (ScheduleType::Recurring, None) => {
                return Err(ForecastError::InvalidSchedule(format!(
                    "recurring {} `{}` has no frequency",
                    record.kind.label(),
                    record.name
                )))
            }
            (ScheduleType::OneTime, _) => Cadence::OneTime,
        };
        let event = FinancialEvent {
            id: record.id,
            name: record.name,
            account_id: record.account_id,
            kind: record.kind,
            amount: record.amount,
            cadence,
            start_date: record.start_date,
            end_date: record.end_date,
            change_schedule: record.change_schedule,
        };
        event.validate()?;
        Ok(event)
    }
}

impl From<FinancialEvent> for EventRecord {
    fn from(event: FinancialEvent) -> Self {
        let schedule_type = match event.cadence {
            Cadence::OneTime => ScheduleType::OneTime,
            Cadence::Recurring(_) => ScheduleType::Recurring,
        };
        EventRecord {
            id: event.id,
            name: event.name,
            account_id: event.account_id,
            kind: event.kind,
            amount: event.amount,
            schedule_type,
            frequency: event.cadence.frequency(),
            start_date: event.start_date,
            end_date: event.end_date,
            change_schedule: event.change_schedule,
        }
    }
}
