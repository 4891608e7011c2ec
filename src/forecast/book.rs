use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::Result,
    ledger::{Account, Balance, FinancialEvent, Transfer},
    storage::LedgerStore,
};

/// One account together with everything the resolvers read about it.
///
/// Snapshots are kept in descending date order, so the first one is the last balance.
#[derive(Debug, Clone)]
pub struct AccountBook {
    pub account: Account,
    pub balances: Vec<Balance>,
    pub events: Vec<FinancialEvent>,
    pub transfers: Vec<Transfer>,
}

impl AccountBook {
    pub fn new(
        account: Account,
        mut balances: Vec<Balance>,
        events: Vec<FinancialEvent>,
        transfers: Vec<Transfer>,
    ) -> Self {
        balances.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            account,
            balances,
            events,
            transfers,
        }
    }

    pub fn load<S: LedgerStore + ?Sized>(store: &S, account_id: Uuid) -> Result<Self> {
        let account = store.require_account(account_id)?;
        let balances = store.balances(account_id)?;
        let events = store.events(account_id)?;
        let transfers = store.transfers(account_id)?;
        tracing::debug!(
            account = %account_id,
            balances = balances.len(),
            events = events.len(),
            transfers = transfers.len(),
            "account book loaded"
        );
        Ok(Self::new(account, balances, events, transfers))
    }

    pub fn id(&self) -> Uuid {
        self.account.id
    }

    pub fn last_balance(&self) -> Option<&Balance> {
        self.balances.first()
    }

    /// Latest snapshot dated on or before `date`.
    pub fn balance_on_or_before(&self, date: NaiveDate) -> Option<&Balance> {
        self.balances.iter().find(|balance| balance.date <= date)
    }

    pub fn balance_on(&self, date: NaiveDate) -> Option<&Balance> {
        self.balances.iter().find(|balance| balance.date == date)
    }

    pub fn bills(&self) -> impl Iterator<Item = &FinancialEvent> {
        self.events.iter().filter(|event| event.is_bill())
    }

    pub fn incoming_transfers(&self) -> impl Iterator<Item = &Transfer> {
        let id = self.account.id;
        self.transfers
            .iter()
            .filter(move |transfer| transfer.to_account_id == id)
    }

    pub fn outgoing_transfers(&self) -> impl Iterator<Item = &Transfer> {
        let id = self.account.id;
        self.transfers
            .iter()
            .filter(move |transfer| transfer.from_account_id == id)
    }
}
