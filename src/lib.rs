#![doc(test(attr(deny(warnings))))]

//! Cashflow Core resolves what recurring bills, incomes, and transfers do to an
//! account on any given date, and projects day-by-day balances on top of
//! recorded snapshots.
//!
//! The pure calculators ([`ledger::meets_frequency`], [`ledger::apply_changes`],
//! [`forecast::effective_amount`]) need no storage. Everything that looks at
//! snapshots or other accounts goes through a [`storage::LedgerStore`] and the
//! [`forecast::ProjectionEngine`].

pub mod config;
pub mod errors;
pub mod forecast;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use config::{ConfigManager, ProjectionConfig};
pub use errors::{ForecastError, Result};
pub use forecast::{effective_amount, AccountBook, BalanceProjection, ProjectionEngine};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashflow Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
