//! Read-only query seam between the forecasting core and whatever persists records.

pub mod memory;

use uuid::Uuid;

use crate::{
    errors::{ForecastError, Result},
    ledger::{Account, Balance, DateWindow, FinancialEvent, Transaction, Transfer},
};

pub use memory::Ledger;

/// Abstraction over persistence backends capable of answering account-scoped queries.
///
/// Implementations must present a consistent snapshot for the duration of one
/// projection; the core never writes through this trait.
pub trait LedgerStore: Send + Sync {
    fn account(&self, id: Uuid) -> Result<Option<Account>>;

    /// Every recorded balance snapshot for the account, in any order.
    fn balances(&self, account_id: Uuid) -> Result<Vec<Balance>>;

    /// Recorded transactions dated inside `window` (inclusive).
    fn transactions(&self, account_id: Uuid, window: DateWindow) -> Result<Vec<Transaction>>;

    /// Bills and incomes owned by the account.
    fn events(&self, account_id: Uuid) -> Result<Vec<FinancialEvent>>;

    /// Transfers with the account on either side.
    fn transfers(&self, account_id: Uuid) -> Result<Vec<Transfer>>;

    /// Like [`LedgerStore::account`] but treats absence as an error.
    fn require_account(&self, id: Uuid) -> Result<Account> {
        self.account(id)?.ok_or(ForecastError::AccountNotFound(id))
    }
}
