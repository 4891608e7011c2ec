use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use super::{
    book::AccountBook,
    card,
    resolver::DayResolver,
    transfers::resolve_transfer,
    upcoming::{upcoming_window, UpcomingItem},
};
use crate::{
    config::ProjectionConfig,
    errors::Result,
    ledger::{DateRange, DateWindow, FinancialEvent, Transfer},
    storage::LedgerStore,
};

/// Entry point for date-specific resolution and balance projection over a store.
///
/// The engine holds no state between calls beyond its configuration; every
/// projection reloads what it needs, so callers may re-project any window at any time.
pub struct ProjectionEngine<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    config: ProjectionConfig,
}

impl<'a, S: LedgerStore + ?Sized> ProjectionEngine<'a, S> {
    pub fn new(store: &'a S, config: ProjectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn with_defaults(store: &'a S) -> Self {
        Self {
            store,
            config: ProjectionConfig::default(),
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn book(&self, account_id: Uuid) -> Result<AccountBook> {
        AccountBook::load(self.store, account_id)
    }

    /// [`super::effective_amount`] under this engine's day-overflow policy.
    pub fn effective_amount(&self, event: &FinancialEvent, date: NaiveDate) -> Decimal {
        event.effective_amount(date, self.config.day_overflow)
    }

    pub fn card_balance(&self, account_id: Uuid, date: NaiveDate) -> Result<Decimal> {
        let book = self.book(account_id)?;
        Ok(card::card_balance(&book, date, &self.config))
    }

    /// Signed effect of `transfer` on `account_id` for `date`.
    pub fn transfer_amount(
        &self,
        transfer: &Transfer,
        date: NaiveDate,
        account_id: Uuid,
    ) -> Result<Decimal> {
        let destination = if transfer.payoff_balance
            && transfer.involves(account_id)
            && transfer.occurs_on(date, self.config.day_overflow)
        {
            Some(self.book(transfer.to_account_id)?)
        } else {
            None
        };
        let config = &self.config;
        Ok(resolve_transfer(
            transfer,
            date,
            account_id,
            config.day_overflow,
            |on| {
                destination
                    .as_ref()
                    .map_or(Decimal::ZERO, |book| card::card_balance(book, on, config))
            },
        ))
    }

    /// Balance known on `date` from recorded data only, with the date it is anchored to.
    ///
    /// The latest snapshot on or before `date` plus every transaction after it, up to
    /// and including `date`. Without a snapshot the balance is zero, anchored at `date`.
    pub fn starting_balance(&self, account_id: Uuid, date: NaiveDate) -> Result<(Decimal, NaiveDate)> {
        let book = self.book(account_id)?;
        self.starting_balance_for(&book, date)
    }

    fn starting_balance_for(&self, book: &AccountBook, date: NaiveDate) -> Result<(Decimal, NaiveDate)> {
        let Some(snapshot) = book.balance_on_or_before(date) else {
            tracing::info!(account = %book.id(), %date, "no snapshot; starting from zero");
            return Ok((Decimal::ZERO, date));
        };
        if snapshot.date == date {
            tracing::info!(account = %book.id(), %date, amount = %snapshot.amount, "starting from snapshot");
            return Ok((snapshot.amount, date));
        }

        let window = DateWindow::new(snapshot.date + Duration::days(1), date)?;
        let transactions = self.store.transactions(book.id(), window)?;
        let amount = snapshot.amount + transactions.iter().map(|txn| txn.amount).sum::<Decimal>();
        let anchor = transactions
            .iter()
            .map(|txn| txn.date)
            .max()
            .unwrap_or(snapshot.date);
        tracing::info!(
            account = %book.id(),
            snapshot = %snapshot.date,
            bridged = transactions.len(),
            %anchor,
            %amount,
            "starting balance resolved"
        );
        Ok((amount, anchor))
    }

    /// Projects the account's balance on each of `dates`, emitted in ascending order.
    ///
    /// The walk starts at the anchor of the starting balance for the earliest date,
    /// so scheduled effects between the anchor and that date are applied. Everything
    /// the projection reads is loaded up front; iterating the returned sequence never
    /// fails and never touches the store.
    pub fn project<I>(&self, account_id: Uuid, dates: I) -> Result<BalanceProjection>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let resolver = DayResolver::load(self.store, account_id, self.config)?;
        let mut targets: Vec<NaiveDate> = dates.into_iter().collect();
        targets.sort();

        let cursor = match targets.first() {
            Some(first) => {
                let (amount, anchor) = self.starting_balance_for(resolver.book(), *first)?;
                Some((anchor, amount))
            }
            None => None,
        };

        Ok(BalanceProjection {
            resolver,
            targets: targets.into_iter(),
            cursor,
        })
    }

    /// Projected balance for every date from `start` through `end`.
    pub fn daily_balances(
        &self,
        account_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, Decimal)>> {
        let window = DateWindow::new(start, end)?;
        Ok(self.project(account_id, window.days())?.collect())
    }

    /// Every non-zero bill, income and transfer effect on the account inside `window`,
    /// ordered by date.
    pub fn upcoming(&self, account_id: Uuid, window: DateWindow) -> Result<Vec<UpcomingItem>> {
        let resolver = DayResolver::load(self.store, account_id, self.config)?;
        let items: Vec<UpcomingItem> = window
            .days()
            .flat_map(|date| {
                resolver
                    .effects_on(date)
                    .filter(|(_, _, amount)| !amount.is_zero())
                    .map(move |(source, name, amount)| UpcomingItem {
                        name: name.to_string(),
                        amount,
                        date,
                        source,
                    })
            })
            .collect();
        tracing::debug!(account = %account_id, items = items.len(), "upcoming items listed");
        Ok(items)
    }

    /// [`ProjectionEngine::upcoming`] over the default two-week horizon from `today`.
    pub fn upcoming_from(&self, account_id: Uuid, today: NaiveDate) -> Result<Vec<UpcomingItem>> {
        self.upcoming(account_id, upcoming_window(today))
    }
}

/// Lazily projected `(date, balance)` pairs for one account.
#[derive(Debug, Clone)]
pub struct BalanceProjection {
    resolver: DayResolver,
    targets: std::vec::IntoIter<NaiveDate>,
    /// Date the running balance is known for, and its unrounded value.
    cursor: Option<(NaiveDate, Decimal)>,
}

impl BalanceProjection {
    pub fn account_id(&self) -> Uuid {
        self.resolver.book().id()
    }

    /// Steps the running balance from `from` (exclusive) to `to` (inclusive).
    fn advance(&self, from: NaiveDate, mut balance: Decimal, to: NaiveDate) -> Decimal {
        let book = self.resolver.book();
        for date in DateRange::new(from + Duration::days(1), to) {
            balance = match book.balance_on(date) {
                Some(snapshot) => snapshot.amount,
                None => balance + self.resolver.day_effect(date),
            };
        }
        balance
    }

    fn emit(&self, date: NaiveDate, balance: Decimal) -> (NaiveDate, Decimal) {
        let rounded = balance.round_dp_with_strategy(
            self.resolver.config().currency_precision,
            RoundingStrategy::MidpointAwayFromZero,
        );
        tracing::debug!(account = %self.account_id(), %date, balance = %rounded, "projected");
        (date, rounded)
    }
}

impl Iterator for BalanceProjection {
    type Item = (NaiveDate, Decimal);

    fn next(&mut self) -> Option<Self::Item> {
        let target = self.targets.next()?;
        let (current, balance) = self.cursor?;
        let balance = if target > current {
            let advanced = self.advance(current, balance, target);
            self.cursor = Some((target, advanced));
            advanced
        } else {
            balance
        };
        Some(self.emit(target, balance))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.targets.size_hint()
    }
}

impl ExactSizeIterator for BalanceProjection {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        forecast::upcoming::UpcomingSource,
        ledger::{Account, AccountKind, Balance, Cadence, Frequency, Transaction},
        storage::Ledger,
    };
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn checking_ledger() -> (Ledger, Uuid) {
        let mut ledger = Ledger::new("Projection");
        let checking = ledger.add_account(Account::new("Checking", AccountKind::Checking));
        ledger
            .add_balance(Balance::new(checking, d(2024, 1, 1), dec!(1000)))
            .unwrap();
        ledger
            .add_event(FinancialEvent::bill(
                "Rent",
                checking,
                dec!(-500),
                Cadence::Recurring(Frequency::months(1)),
                d(2024, 1, 3),
            ))
            .unwrap();
        (ledger, checking)
    }

    #[test]
    fn starting_balance_bridges_transactions_after_snapshot() {
        let (mut ledger, checking) = checking_ledger();
        ledger
            .add_transaction(Transaction::new(checking, d(2024, 1, 5), dec!(-20)))
            .unwrap();
        ledger
            .add_transaction(Transaction::new(checking, d(2024, 1, 7), dec!(45.50)))
            .unwrap();
        ledger
            .add_transaction(Transaction::new(checking, d(2024, 1, 20), dec!(-999)))
            .unwrap();
        let engine = ProjectionEngine::with_defaults(&ledger);

        assert_eq!(
            engine.starting_balance(checking, d(2024, 1, 1)).unwrap(),
            (dec!(1000), d(2024, 1, 1))
        );
        assert_eq!(
            engine.starting_balance(checking, d(2024, 1, 10)).unwrap(),
            (dec!(1025.50), d(2024, 1, 7))
        );
        assert_eq!(
            engine.starting_balance(checking, d(2024, 1, 2)).unwrap(),
            (dec!(1000), d(2024, 1, 1))
        );
        assert_eq!(
            engine.starting_balance(checking, d(2023, 12, 31)).unwrap(),
            (Decimal::ZERO, d(2023, 12, 31))
        );
    }

    #[test]
    fn projection_steps_through_recurring_bills() {
        let (ledger, checking) = checking_ledger();
        let engine = ProjectionEngine::with_defaults(&ledger);
        let series: Vec<_> = engine
            .project(checking, [d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 3, 3)])
            .unwrap()
            .collect();
        assert_eq!(
            series,
            vec![
                (d(2024, 1, 1), dec!(1000)),
                (d(2024, 1, 2), dec!(1000)),
                (d(2024, 1, 3), dec!(500)),
                (d(2024, 3, 3), dec!(-500)),
            ]
        );
    }

    #[test]
    fn first_target_after_snapshot_applies_effects_since_anchor() {
        let (ledger, checking) = checking_ledger();
        let engine = ProjectionEngine::with_defaults(&ledger);

        let alone: Vec<_> = engine.project(checking, [d(2024, 1, 10)]).unwrap().collect();
        let from_snapshot = engine
            .project(checking, [d(2024, 1, 1), d(2024, 1, 10)])
            .unwrap()
            .last();
        assert_eq!(alone, vec![(d(2024, 1, 10), dec!(500))]);
        assert_eq!(from_snapshot, Some((d(2024, 1, 10), dec!(500))));
        assert_eq!(
            engine
                .daily_balances(checking, d(2024, 1, 10), d(2024, 1, 11))
                .unwrap(),
            vec![(d(2024, 1, 10), dec!(500)), (d(2024, 1, 11), dec!(500))]
        );
    }

    #[test]
    fn walk_starts_at_last_bridged_transaction() {
        let (mut ledger, checking) = checking_ledger();
        // Rent on Jan 3 was recorded as a transaction, so the walk starts after it.
        ledger
            .add_transaction(Transaction::new(checking, d(2024, 1, 3), dec!(-500)))
            .unwrap();
        let engine = ProjectionEngine::with_defaults(&ledger);
        let series: Vec<_> = engine
            .project(checking, [d(2024, 1, 10), d(2024, 2, 3)])
            .unwrap()
            .collect();
        assert_eq!(
            series,
            vec![(d(2024, 1, 10), dec!(500)), (d(2024, 2, 3), dec!(0))]
        );
    }

    #[test]
    fn upcoming_lists_signed_occurrences_in_date_order() {
        let (mut ledger, checking) = checking_ledger();
        let savings = ledger.add_account(Account::new("Savings", AccountKind::Savings));
        let transfer_id = ledger
            .add_transfer(Transfer::new(
                "Save",
                checking,
                savings,
                dec!(100),
                Cadence::OneTime,
                d(2024, 2, 1),
            ))
            .unwrap();
        let rent_id = ledger.events[0].id;
        let engine = ProjectionEngine::with_defaults(&ledger);

        let window = DateWindow::new(d(2024, 1, 25), d(2024, 2, 5)).unwrap();
        let items = engine.upcoming(checking, window).unwrap();
        assert_eq!(
            items,
            vec![
                UpcomingItem {
                    name: "Save".into(),
                    amount: dec!(100),
                    date: d(2024, 2, 1),
                    source: UpcomingSource::Transfer(transfer_id),
                },
                UpcomingItem {
                    name: "Rent".into(),
                    amount: dec!(-500),
                    date: d(2024, 2, 3),
                    source: UpcomingSource::Event(rent_id),
                },
            ]
        );

        let for_savings = engine.upcoming(savings, window).unwrap();
        assert_eq!(for_savings.len(), 1);
        assert_eq!(for_savings[0].amount, dec!(-100));

        let default_horizon = engine.upcoming_from(checking, d(2024, 1, 19)).unwrap();
        assert_eq!(default_horizon.len(), 1);
        assert_eq!(default_horizon[0].date, d(2024, 2, 1));
    }

    #[test]
    fn unsorted_targets_are_emitted_ascending() {
        let (ledger, checking) = checking_ledger();
        let engine = ProjectionEngine::with_defaults(&ledger);
        let dates: Vec<_> = engine
            .project(checking, [d(2024, 2, 3), d(2024, 1, 1)])
            .unwrap()
            .map(|(date, _)| date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 2, 3)]);
    }

    #[test]
    fn emitted_balances_are_rounded() {
        let mut ledger = Ledger::new("Rounding");
        let checking = ledger.add_account(Account::new("Checking", AccountKind::Checking));
        ledger
            .add_balance(Balance::new(checking, d(2024, 1, 1), dec!(10.005)))
            .unwrap();
        let engine = ProjectionEngine::with_defaults(&ledger);
        let series: Vec<_> = engine.project(checking, [d(2024, 1, 1)]).unwrap().collect();
        assert_eq!(series, vec![(d(2024, 1, 1), dec!(10.01))]);
    }

    #[test]
    fn unknown_account_is_not_found() {
        let (ledger, _) = checking_ledger();
        let engine = ProjectionEngine::with_defaults(&ledger);
        let err = engine
            .project(Uuid::new_v4(), [d(2024, 1, 1)])
            .expect_err("unknown account");
        assert!(err.is_not_found());
        assert!(engine
            .starting_balance(Uuid::new_v4(), d(2024, 1, 1))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let (ledger, _) = checking_ledger();
        let config = ProjectionConfig {
            payoff_search_limit: 0,
            ..ProjectionConfig::default()
        };
        assert!(ProjectionEngine::new(&ledger, config).is_err());
    }

    #[test]
    fn reversed_daily_window_is_invalid_input() {
        let (ledger, checking) = checking_ledger();
        let engine = ProjectionEngine::with_defaults(&ledger);
        let err = engine
            .daily_balances(checking, d(2024, 2, 1), d(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, crate::ForecastError::InvalidInput(_)));
    }
}
