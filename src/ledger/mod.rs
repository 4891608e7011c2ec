//! Ledger domain models, value objects, and the pure schedule predicates.

pub mod account;
pub mod calendar;
pub mod change_schedule;
pub mod event;
pub mod frequency;
pub mod transaction;
pub mod transfer;

pub use account::{Account, AccountKind};
pub use calendar::{date_range, DateRange, DateWindow, DateWindowError};
pub use change_schedule::{apply_changes, apply_changes_with, ChangeKind, ChangeScheduleEntry};
pub use event::{Cadence, EventKind, EventRecord, FinancialEvent, ScheduleType};
pub use frequency::{meets_frequency, DayOverflow, Frequency, FrequencyUnit};
pub use transaction::{Balance, Transaction};
pub use transfer::{Transfer, TransferRecord};
