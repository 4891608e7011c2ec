use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Credit,
    Investment,
    Loan,
    Savings,
}

impl AccountKind {
    /// Accounts whose balance can be paid off by a payoff transfer.
    pub fn is_credit(self) -> bool {
        matches!(self, AccountKind::Credit)
    }
}

/// Represents a financial account that balances are recorded and projected for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
}

impl Account {
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }
}
