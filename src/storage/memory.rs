use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LedgerStore;
use crate::{
    errors::{ForecastError, Result},
    ledger::{Account, Balance, DateWindow, FinancialEvent, Transaction, Transfer},
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory snapshot of every record the forecasting core reads.
///
/// The `add_*` builders validate references as records arrive, so a populated
/// ledger always satisfies the store invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub events: Vec<FinancialEvent>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            accounts: Vec::new(),
            balances: Vec::new(),
            transactions: Vec::new(),
            events: Vec::new(),
            transfers: Vec::new(),
            updated_at: Utc::now(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        self.touch();
        id
    }

    /// Records a snapshot, replacing any existing snapshot for the same account and date.
    pub fn add_balance(&mut self, balance: Balance) -> Result<()> {
        self.ensure_account(balance.account_id)?;
        self.balances.retain(|existing| {
            !(existing.account_id == balance.account_id && existing.date == balance.date)
        });
        self.balances.push(balance);
        self.touch();
        Ok(())
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid> {
        self.ensure_account(transaction.account_id)?;
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        Ok(id)
    }

    pub fn add_event(&mut self, event: FinancialEvent) -> Result<Uuid> {
        self.ensure_account(event.account_id)?;
        event.validate()?;
        let id = event.id;
        self.events.push(event);
        self.touch();
        Ok(id)
    }

    pub fn add_transfer(&mut self, transfer: Transfer) -> Result<Uuid> {
        self.ensure_account(transfer.from_account_id)?;
        let destination = self.ensure_account(transfer.to_account_id)?;
        transfer.validate()?;
        if transfer.payoff_balance && !destination.kind.is_credit() {
            return Err(ForecastError::InvalidSchedule(format!(
                "payoff transfer `{}` must target a credit account, `{}` is not one",
                transfer.name, destination.name
            )));
        }
        let id = transfer.id;
        self.transfers.push(transfer);
        self.touch();
        Ok(id)
    }

    pub fn account_by_id(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn ensure_account(&self, id: Uuid) -> Result<&Account> {
        self.account_by_id(id).ok_or(ForecastError::AccountNotFound(id))
    }
}

impl LedgerStore for Ledger {
    fn account(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.account_by_id(id).cloned())
    }

    fn balances(&self, account_id: Uuid) -> Result<Vec<Balance>> {
        Ok(self
            .balances
            .iter()
            .filter(|balance| balance.account_id == account_id)
            .cloned()
            .collect())
    }

    fn transactions(&self, account_id: Uuid, window: DateWindow) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|txn| txn.account_id == account_id && window.contains(txn.date))
            .cloned()
            .collect())
    }

    fn events(&self, account_id: Uuid) -> Result<Vec<FinancialEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|event| event.account_id == account_id)
            .cloned()
            .collect())
    }

    fn transfers(&self, account_id: Uuid) -> Result<Vec<Transfer>> {
        Ok(self
            .transfers
            .iter()
            .filter(|transfer| transfer.involves(account_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{AccountKind, Cadence, Frequency};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn records_for_unknown_accounts_are_rejected() {
        let mut ledger = Ledger::new("Test");
        let err = ledger
            .add_balance(Balance::new(Uuid::new_v4(), d(2024, 1, 1), dec!(10)))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn payoff_transfer_requires_credit_destination() {
        let mut ledger = Ledger::new("Test");
        let checking = ledger.add_account(Account::new("Checking", AccountKind::Checking));
        let savings = ledger.add_account(Account::new("Savings", AccountKind::Savings));
        let card = ledger.add_account(Account::new("Card", AccountKind::Credit));
        let monthly = Cadence::Recurring(Frequency::months(1));

        let err = ledger
            .add_transfer(Transfer::payoff("Bad", checking, savings, monthly, d(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidSchedule(_)));

        ledger
            .add_transfer(Transfer::payoff("Card", checking, card, monthly, d(2024, 1, 1)))
            .expect("credit destination accepted");
        assert_eq!(ledger.transfers(checking).unwrap().len(), 1);
        assert_eq!(ledger.transfers(card).unwrap().len(), 1);
        assert!(ledger.transfers(savings).unwrap().is_empty());
    }

    #[test]
    fn same_day_snapshot_replaces_previous() {
        let mut ledger = Ledger::new("Test");
        let checking = ledger.add_account(Account::new("Checking", AccountKind::Checking));
        ledger
            .add_balance(Balance::new(checking, d(2024, 1, 1), dec!(10)))
            .unwrap();
        ledger
            .add_balance(Balance::new(checking, d(2024, 1, 1), dec!(25)))
            .unwrap();
        let balances = ledger.balances(checking).unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].amount, dec!(25));
    }

    #[test]
    fn transactions_are_scoped_by_window() {
        let mut ledger = Ledger::new("Test");
        let checking = ledger.add_account(Account::new("Checking", AccountKind::Checking));
        for day in [1, 10, 20] {
            ledger
                .add_transaction(Transaction::new(checking, d(2024, 1, day), dec!(5)))
                .unwrap();
        }
        let window = DateWindow::new(d(2024, 1, 5), d(2024, 1, 20)).unwrap();
        assert_eq!(ledger.transactions(checking, window).unwrap().len(), 2);
    }
}
