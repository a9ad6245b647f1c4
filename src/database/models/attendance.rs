use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: String,
    pub worker_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
    pub marked_by: String,
    pub created_at: DateTime<Utc>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    #[serde(rename_all = "lowercase")]
    pub enum AttendanceStatus {
        Present => "present",
        Half => "half",
        Absent => "absent",
        Holiday => "holiday",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceInput {
    pub worker_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceUpdateInput {
    pub status: AttendanceStatus,
}

/// Result of a toggle: the record now stored for the day, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceToggleResult {
    pub worker_id: String,
    pub date: NaiveDate,
    pub attendance: Option<Attendance>,
    pub accrual: Option<SalaryAccrual>,
}

/// Same-day salary accrual kept alongside each attendance record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SalaryAccrual {
    pub id: String,
    pub worker_id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
}
