use std::convert::TryFrom;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    event::Cadence,
    frequency::{DayOverflow, Frequency},
};
use crate::errors::{ForecastError, Result};

/// Money moving between two accounts, optionally paying off the destination's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransferRecord", into = "TransferRecord")]
pub struct Transfer {
    pub id: Uuid,
    pub name: String,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    /// Non-negative; direction comes from the querying account.
    pub amount: Decimal,
    pub cadence: Cadence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Replace `amount` with the destination's outstanding card balance on each occurrence.
    pub payoff_balance: bool,
}

impl Transfer {
    pub fn new(
        name: impl Into<String>,
        from_account_id: Uuid,
        to_account_id: Uuid,
        amount: Decimal,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            from_account_id,
            to_account_id,
            amount,
            cadence,
            start_date,
            end_date: None,
            payoff_balance: false,
        }
    }

    /// A transfer that pays off whatever the destination card owes on each occurrence.
    pub fn payoff(
        name: impl Into<String>,
        from_account_id: Uuid,
        to_account_id: Uuid,
        cadence: Cadence,
        start_date: NaiveDate,
    ) -> Self {
        let mut transfer = Self::new(
            name,
            from_account_id,
            to_account_id,
            Decimal::ZERO,
            cadence,
            start_date,
        );
        transfer.payoff_balance = true;
        transfer
    }

    pub fn ending(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(ForecastError::InvalidSchedule(format!(
                "transfer `{}` has a negative amount",
                self.name
            )));
        }
        if self.from_account_id == self.to_account_id {
            return Err(ForecastError::InvalidSchedule(format!(
                "transfer `{}` moves money into its own source account",
                self.name
            )));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ForecastError::InvalidSchedule(format!(
                    "transfer `{}` ends ({}) before it starts ({})",
                    self.name, end, self.start_date
                )));
            }
        }
        if let Cadence::Recurring(frequency) = &self.cadence {
            frequency.validate()?;
        }
        Ok(())
    }

    pub fn involves(&self, account_id: Uuid) -> bool {
        self.from_account_id == account_id || self.to_account_id == account_id
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    /// Whether the transfer fires on `date`, ignoring its amount.
    pub fn occurs_on(&self, date: NaiveDate, overflow: DayOverflow) -> bool {
        self.is_active_on(date) && self.cadence.occurs_on(date, self.start_date, overflow)
    }
}

/// Flat storage shape of a [`Transfer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: Uuid,
    pub name: String,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub payoff_balance: bool,
}

impl TryFrom<TransferRecord> for Transfer {
    type Error = ForecastError;

    fn try_from(record: TransferRecord) -> Result<Self> {
        let transfer = Transfer {
            id: record.id,
            name: record.name,
            from_account_id: record.from_account_id,
            to_account_id: record.to_account_id,
            amount: record.amount,
            cadence: Cadence::from_frequency(record.frequency),
            start_date: record.start_date,
            end_date: record.end_date,
            payoff_balance: record.payoff_balance,
        };
        transfer.validate()?;
        Ok(transfer)
    }
}

impl From<Transfer> for TransferRecord {
    fn from(transfer: Transfer) -> Self {
        TransferRecord {
            id: transfer.id,
            name: transfer.name,
            from_account_id: transfer.from_account_id,
            to_account_id: transfer.to_account_id,
            amount: transfer.amount,
            frequency: transfer.cadence.frequency(),
            start_date: transfer.start_date,
            end_date: transfer.end_date,
            payoff_balance: transfer.payoff_balance,
        }
    }
}
