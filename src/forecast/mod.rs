//! Date-specific resolution of events and transfers, card balances, and balance projection.

pub mod book;
pub mod card;
pub mod effective;
pub mod projection;
mod resolver;
pub mod summary;
pub mod transfers;
pub mod upcoming;

pub use book::AccountBook;
pub use card::card_balance;
pub use effective::effective_amount;
pub use projection::{BalanceProjection, ProjectionEngine};
pub use summary::{account_summary, monthly_cash_flow, AccountSummary, MonthlyCashFlow, SummaryPeriod};
pub use transfers::resolve_transfer;
pub use upcoming::{upcoming_window, UpcomingItem, UpcomingSource, DEFAULT_UPCOMING_DAYS};
