use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded, ground-truth account balance on a specific date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl Balance {
    pub fn new(account_id: Uuid, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            account_id,
            date,
            amount,
        }
    }
}

/// An immutable ledger line recorded after the fact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(account_id: Uuid, date: NaiveDate, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            date,
            amount,
            description: String::new(),
            note: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
