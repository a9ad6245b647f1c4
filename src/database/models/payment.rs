use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A payout covering a period. Descriptive only, never reconciled
/// against attendance.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: String,
    pub worker_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub worker_id: String,
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
}
