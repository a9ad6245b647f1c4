use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::payroll::WorkerLedger;

pub const DEFAULT_DAILY_RATE: f64 = 500.0;
pub const DEFAULT_SITE: &str = "Zonuam Site";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Worker {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub site_id: String,
    pub daily_rate: f64,
    pub max_advance_limit: Option<f64>,
    /// Running total, not tied to a date
    pub overtime: f64,
    /// Running total, may be negative
    pub other_adjustments: f64,
    pub hidden: bool,
    pub status: WorkerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum WorkerStatus {
        #[default]
        Active => "active",
        Inactive => "inactive",
    }
}

impl Worker {
    pub fn ledger(&self) -> WorkerLedger {
        WorkerLedger {
            daily_rate: self.daily_rate,
            overtime: self.overtime,
            other_adjustments: self.other_adjustments,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkerInput {
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub site_id: Option<String>,
    pub daily_rate: Option<f64>,
    pub max_advance_limit: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub site_id: Option<String>,
    pub daily_rate: Option<f64>,
    pub max_advance_limit: Option<f64>,
    pub status: Option<WorkerStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiddenInput {
    pub hidden: bool,
}

/// Amount added to one of the worker's running totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountInput {
    pub amount: f64,
}
