#![allow(dead_code)]

use cashflow_core::ledger::{
    Account, AccountKind, Balance, Cadence, FinancialEvent, Frequency, Transfer,
};
use cashflow_core::storage::Ledger;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

/// Household fixture: checking pays rent and receives salary, and pays off a card monthly.
pub struct Household {
    pub ledger: Ledger,
    pub checking: Uuid,
    pub card: Uuid,
    pub payoff: Transfer,
}

pub fn household() -> Household {
    let mut ledger = Ledger::new("Household");
    let checking = ledger.add_account(Account::new("Checking", AccountKind::Checking));
    let card = ledger.add_account(Account::new("Card", AccountKind::Credit));

    ledger
        .add_balance(Balance::new(checking, d(2024, 1, 1), dec!(1000)))
        .expect("checking snapshot");
    ledger
        .add_balance(Balance::new(card, d(2024, 1, 1), dec!(-200)))
        .expect("card snapshot");

    ledger
        .add_event(FinancialEvent::income(
            "Salary",
            checking,
            dec!(2500),
            Cadence::Recurring(Frequency::months(1)),
            d(2024, 1, 31),
        ))
        .expect("salary");
    ledger
        .add_event(FinancialEvent::bill(
            "Rent",
            checking,
            dec!(-1200),
            Cadence::Recurring(Frequency::months(1)),
            d(2024, 1, 3),
        ))
        .expect("rent");
    ledger
        .add_event(FinancialEvent::bill(
            "Groceries",
            card,
            dec!(-50),
            Cadence::Recurring(Frequency::weeks(1)),
            d(2024, 1, 10),
        ))
        .expect("groceries");

    let payoff = Transfer::payoff(
        "Pay card",
        checking,
        card,
        Cadence::Recurring(Frequency::months(1)),
        d(2024, 1, 25),
    );
    ledger.add_transfer(payoff.clone()).expect("payoff");

    Household {
        ledger,
        checking,
        card,
        payoff,
    }
}

/// [`household`] plus a savings account fed by a fixed monthly transfer from checking.
pub fn household_with_savings() -> (Household, Uuid) {
    let mut fixture = household();
    let savings = fixture
        .ledger
        .add_account(Account::new("Savings", AccountKind::Savings));
    fixture
        .ledger
        .add_transfer(Transfer::new(
            "Save",
            fixture.checking,
            savings,
            dec!(100),
            Cadence::Recurring(Frequency::months(1)),
            d(2024, 1, 15),
        ))
        .expect("savings transfer");
    (fixture, savings)
}
