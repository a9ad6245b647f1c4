use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::payroll::EarningsSummary;

#[derive(Debug, Clone, Deserialize)]
pub struct ReportQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub site_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerAttendanceStats {
    pub worker_id: String,
    pub name: String,
    pub role: Option<String>,
    pub total_days: u32,
    pub working_days: u32,
    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceReport {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub total_workers: usize,
    /// Present plus half days across all workers
    pub total_present: u32,
    pub total_absent: u32,
    pub attendance_rate: f64,
    pub workers: Vec<WorkerAttendanceStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPayroll {
    pub worker_id: String,
    pub name: String,
    pub summary: EarningsSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollReport {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub gross_earnings: f64,
    pub total_advances: f64,
    pub net_payable: f64,
    pub workers: Vec<WorkerPayroll>,
}
