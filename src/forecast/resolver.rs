use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{book::AccountBook, card, transfers::resolve_transfer, upcoming::UpcomingSource};
use crate::{config::ProjectionConfig, errors::Result, storage::LedgerStore};

/// Everything needed to resolve one account's scheduled effects on any date
/// without going back to the store.
#[derive(Debug, Clone)]
pub(crate) struct DayResolver {
    book: AccountBook,
    /// Destination books of the account's payoff transfers.
    cards: HashMap<Uuid, AccountBook>,
    config: ProjectionConfig,
}

impl DayResolver {
    pub(crate) fn load<S: LedgerStore + ?Sized>(
        store: &S,
        account_id: Uuid,
        config: ProjectionConfig,
    ) -> Result<Self> {
        let book = AccountBook::load(store, account_id)?;
        let mut cards = HashMap::new();
        for transfer in &book.transfers {
            let card_id = transfer.to_account_id;
            if !transfer.payoff_balance || cards.contains_key(&card_id) {
                continue;
            }
            let card_book = if card_id == book.id() {
                book.clone()
            } else {
                AccountBook::load(store, card_id)?
            };
            cards.insert(card_id, card_book);
        }
        Ok(Self {
            book,
            cards,
            config,
        })
    }

    pub(crate) fn book(&self) -> &AccountBook {
        &self.book
    }

    pub(crate) fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Every bill, income and transfer of the account with its signed effect on `date`.
    ///
    /// Entities that do not occur on `date` are included with a zero amount.
    pub(crate) fn effects_on(
        &self,
        date: NaiveDate,
    ) -> impl Iterator<Item = (UpcomingSource, &str, Decimal)> + '_ {
        let overflow = self.config.day_overflow;
        let account_id = self.book.id();
        let events = self.book.events.iter().map(move |event| {
            (
                UpcomingSource::Event(event.id),
                event.name.as_str(),
                event.effective_amount(date, overflow),
            )
        });
        let transfers = self.book.transfers.iter().map(move |transfer| {
            let amount = resolve_transfer(transfer, date, account_id, overflow, |on| {
                self.cards
                    .get(&transfer.to_account_id)
                    .map_or(Decimal::ZERO, |card_book| {
                        card::card_balance(card_book, on, &self.config)
                    })
            });
            (UpcomingSource::Transfer(transfer.id), transfer.name.as_str(), amount)
        });
        events.chain(transfers)
    }

    /// Net scheduled change to the account's balance on `date`.
    pub(crate) fn day_effect(&self, date: NaiveDate) -> Decimal {
        self.effects_on(date).map(|(_, _, amount)| amount).sum()
    }
}
