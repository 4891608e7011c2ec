//! Period roll-ups over recorded transactions and projected balances.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::projection::ProjectionEngine;
use crate::{
    errors::Result,
    ledger::{
        calendar::{month_end, month_start, quarter_end, quarter_start, week_start, year_end, year_start},
        DateWindow, Transaction,
    },
    storage::LedgerStore,
};

/// Recorded income and expenses for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCashFlow {
    /// First day of the month.
    pub month: NaiveDate,
    pub income: Decimal,
    /// Absolute value of all outflows.
    pub expenses: Decimal,
}

impl MonthlyCashFlow {
    fn empty(month: NaiveDate) -> Self {
        Self {
            month,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        }
    }

    fn record(&mut self, amount: Decimal) {
        if amount >= Decimal::ZERO {
            self.income += amount;
        } else {
            self.expenses += amount.abs();
        }
    }

    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Recorded transactions between `start` and `end` (inclusive), grouped by month.
///
/// Months without transactions are omitted.
pub fn monthly_cash_flow<S: LedgerStore + ?Sized>(
    store: &S,
    account_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<MonthlyCashFlow>> {
    store.require_account(account_id)?;
    let window = DateWindow::new(start, end)?;
    let mut months: BTreeMap<NaiveDate, MonthlyCashFlow> = BTreeMap::new();
    for txn in store.transactions(account_id, window)? {
        let month = month_start(txn.date);
        months
            .entry(month)
            .or_insert_with(|| MonthlyCashFlow::empty(month))
            .record(txn.amount);
    }
    Ok(months.into_values().collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryPeriod {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "this week")]
    ThisWeek,
    #[serde(rename = "this month")]
    ThisMonth,
    #[serde(rename = "this quarter")]
    ThisQuarter,
    #[serde(rename = "this year")]
    ThisYear,
}

impl SummaryPeriod {
    /// Calendar window of this period around `reference`. Weeks start on Monday.
    pub fn window(self, reference: NaiveDate) -> DateWindow {
        let (start, end) = match self {
            SummaryPeriod::Today => (reference, reference),
            SummaryPeriod::ThisWeek => {
                let monday = week_start(reference);
                (monday, monday + Duration::days(6))
            }
            SummaryPeriod::ThisMonth => (month_start(reference), month_end(reference)),
            SummaryPeriod::ThisQuarter => (quarter_start(reference), quarter_end(reference)),
            SummaryPeriod::ThisYear => (year_start(reference), year_end(reference)),
        };
        DateWindow { start, end }
    }

    pub fn label(self) -> &'static str {
        match self {
            SummaryPeriod::Today => "today",
            SummaryPeriod::ThisWeek => "this week",
            SummaryPeriod::ThisMonth => "this month",
            SummaryPeriod::ThisQuarter => "this quarter",
            SummaryPeriod::ThisYear => "this year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: Uuid,
    pub period: SummaryPeriod,
    pub window: DateWindow,
    /// Projected balance on the last day of the window.
    pub balance: Decimal,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Balance outlook and recorded cash flow for the period containing `reference`.
///
/// The balance is projected forward from `reference` to the end of the period.
pub fn account_summary<S: LedgerStore + ?Sized>(
    engine: &ProjectionEngine<'_, S>,
    account_id: Uuid,
    period: SummaryPeriod,
    reference: NaiveDate,
) -> Result<AccountSummary> {
    let window = period.window(reference);
    let balance = engine
        .project(account_id, [reference, window.end])?
        .last()
        .map_or(Decimal::ZERO, |(_, balance)| balance);

    let transactions: Vec<Transaction> = engine.store().transactions(account_id, window)?;
    let mut flow = MonthlyCashFlow::empty(window.start);
    for txn in &transactions {
        flow.record(txn.amount);
    }
    tracing::debug!(
        account = %account_id,
        period = period.label(),
        %balance,
        transactions = transactions.len(),
        "account summary"
    );

    Ok(AccountSummary {
        account_id,
        period,
        window,
        balance,
        income: flow.income,
        expenses: flow.expenses,
    })
}
