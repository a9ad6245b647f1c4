use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CashbookEntry {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<String>,
    pub kind: EntryKind,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum EntryKind {
        Income => "income",
        Expense => "expense",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashbookEntryInput {
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<String>,
    pub kind: EntryKind,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CashbookSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub entry_count: usize,
}

impl CashbookSummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CashbookEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.kind {
                EntryKind::Income => summary.total_income += entry.amount,
                EntryKind::Expense => summary.total_expense += entry.amount,
            }
            summary.entry_count += 1;
        }
        summary.balance = summary.total_income - summary.total_expense;
        summary
    }
}
