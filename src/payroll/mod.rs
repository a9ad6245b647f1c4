//! Attendance and earnings bookkeeping.
//!
//! Everything here is pure: callers load attendance and advance rows from
//! the database or the local store and hand them over as `(date, value)`
//! pairs. The same rules back the REST salary endpoint, the payroll report
//! and the offline store.

pub mod advances;
pub mod attendance;
pub mod earnings;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use advances::{TodayAdvance, today_total, validate_advance};
pub use attendance::{accrual_amount, is_expired, next_status};
pub use earnings::{EarningsSummary, WorkerLedger};

#[derive(Debug, Error, PartialEq)]
pub enum PayrollError {
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    #[error("Advance of {amount} exceeds the worker's limit of {limit}")]
    AdvanceLimitExceeded { amount: f64, limit: f64 },
}

/// Inclusive calendar range. A range whose start is after its end is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}
