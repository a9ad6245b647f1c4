use std::collections::HashMap;

use crate::database::models::{
    Advance, Attendance, AttendanceReport, PayrollReport, ReportQuery, Worker,
    WorkerAttendanceStats, WorkerPayroll,
};
use crate::database::repositories::{
    AdvanceRepository, AttendanceRepository, WorkerFilter, WorkerRepository,
};
use crate::error::AppError;
use crate::payroll::DateRange;

#[derive(Clone)]
pub struct ReportService {
    worker_repository: WorkerRepository,
    attendance_repository: AttendanceRepository,
    advance_repository: AdvanceRepository,
}

impl ReportService {
    pub fn new(
        worker_repository: WorkerRepository,
        attendance_repository: AttendanceRepository,
        advance_repository: AdvanceRepository,
    ) -> Self {
        Self {
            worker_repository,
            attendance_repository,
            advance_repository,
        }
    }

    async fn visible_workers(
        &self,
        user_id: &str,
        query: &ReportQuery,
    ) -> Result<Vec<Worker>, AppError> {
        let filter = WorkerFilter {
            site_id: query.site_id.clone(),
            ..WorkerFilter::default()
        };

        Ok(self.worker_repository.get_workers(user_id, &filter).await?)
    }

    pub async fn attendance_report(
        &self,
        user_id: &str,
        query: &ReportQuery,
    ) -> Result<AttendanceReport, AppError> {
        let range = DateRange::new(query.date_from, query.date_to);
        let workers = self.visible_workers(user_id, query).await?;
        let attendance = self
            .attendance_repository
            .get_for_user_in_range(user_id, range)
            .await?;

        Ok(build_attendance_report(range, &workers, attendance))
    }

    pub async fn payroll_report(
        &self,
        user_id: &str,
        query: &ReportQuery,
    ) -> Result<PayrollReport, AppError> {
        let range = DateRange::new(query.date_from, query.date_to);
        let workers = self.visible_workers(user_id, query).await?;
        let attendance = self
            .attendance_repository
            .get_for_user_in_range(user_id, range)
            .await?;
        let advances = self
            .advance_repository
            .get_for_user_in_range(user_id, range)
            .await?;

        Ok(build_payroll_report(range, &workers, attendance, advances))
    }
}

fn group_attendance(attendance: Vec<Attendance>) -> HashMap<String, Vec<Attendance>> {
    let mut grouped: HashMap<String, Vec<Attendance>> = HashMap::new();
    for record in attendance {
        grouped
            .entry(record.worker_id.clone())
            .or_default()
            .push(record);
    }
    grouped
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Day counts per worker. Half days count towards attendance; holidays
/// are left out of the denominator.
pub fn build_attendance_report(
    range: DateRange,
    workers: &[Worker],
    attendance: Vec<Attendance>,
) -> AttendanceReport {
    let mut grouped = group_attendance(attendance);

    let stats: Vec<WorkerAttendanceStats> = workers
        .iter()
        .map(|worker| {
            let records = grouped.remove(&worker.id).unwrap_or_default();
            let summary = worker.ledger().summarize(
                range,
                records.iter().map(|r| (r.date, r.status)),
                std::iter::empty(),
            );

            WorkerAttendanceStats {
                worker_id: worker.id.clone(),
                name: worker.name.clone(),
                role: worker.role.clone(),
                total_days: summary.total_days,
                working_days: summary.working_days,
                present_days: summary.present_days,
                half_days: summary.half_days,
                absent_days: summary.absent_days,
                attendance_percentage: percentage(
                    summary.present_days + summary.half_days,
                    summary.working_days,
                ),
            }
        })
        .collect();

    let total_present = stats.iter().map(|s| s.present_days + s.half_days).sum();
    let total_absent = stats.iter().map(|s| s.absent_days).sum();
    let total_working: u32 = stats.iter().map(|s| s.working_days).sum();

    AttendanceReport {
        date_from: range.from,
        date_to: range.to,
        total_workers: stats.len(),
        total_present,
        total_absent,
        attendance_rate: percentage(total_present, total_working),
        workers: stats,
    }
}

pub fn build_payroll_report(
    range: DateRange,
    workers: &[Worker],
    attendance: Vec<Attendance>,
    advances: Vec<Advance>,
) -> PayrollReport {
    let mut grouped = group_attendance(attendance);
    let mut advances_by_worker: HashMap<String, Vec<Advance>> = HashMap::new();
    for advance in advances {
        advances_by_worker
            .entry(advance.worker_id.clone())
            .or_default()
            .push(advance);
    }

    let payrolls: Vec<WorkerPayroll> = workers
        .iter()
        .map(|worker| {
            let records = grouped.remove(&worker.id).unwrap_or_default();
            let advances = advances_by_worker.remove(&worker.id).unwrap_or_default();

            WorkerPayroll {
                worker_id: worker.id.clone(),
                name: worker.name.clone(),
                summary: worker.ledger().summarize(
                    range,
                    records.iter().map(|r| (r.date, r.status)),
                    advances.iter().map(|a| (a.date, a.amount)),
                ),
            }
        })
        .collect();

    PayrollReport {
        date_from: range.from,
        date_to: range.to,
        gross_earnings: payrolls.iter().map(|p| p.summary.total_earnings).sum(),
        total_advances: payrolls.iter().map(|p| p.summary.total_advances).sum(),
        net_payable: payrolls.iter().map(|p| p.summary.net_payable).sum(),
        workers: payrolls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{AttendanceStatus, WorkerStatus};
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn worker(id: &str, rate: f64) -> Worker {
        Worker {
            id: id.to_string(),
            user_id: "owner".to_string(),
            name: format!("Worker {}", id),
            phone: None,
            role: Some("Mason".to_string()),
            site_id: "site".to_string(),
            daily_rate: rate,
            max_advance_limit: None,
            overtime: 0.0,
            other_adjustments: 0.0,
            hidden: false,
            status: WorkerStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn mark(worker_id: &str, date: &str, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: format!("{}-{}", worker_id, date),
            worker_id: worker_id.to_string(),
            date: d(date),
            status,
            marked_at: Utc::now(),
            marked_by: "owner".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_attendance_report_counts_half_days_as_attended() {
        let range = DateRange::new(d("2025-03-01"), d("2025-03-31"));
        let workers = vec![worker("a", 500.0), worker("b", 400.0)];
        let attendance = vec![
            mark("a", "2025-03-01", AttendanceStatus::Present),
            mark("a", "2025-03-02", AttendanceStatus::Half),
            mark("a", "2025-03-03", AttendanceStatus::Absent),
            mark("a", "2025-03-04", AttendanceStatus::Holiday),
            mark("b", "2025-03-01", AttendanceStatus::Present),
        ];

        let report = build_attendance_report(range, &workers, attendance);

        assert_eq!(report.total_workers, 2);
        assert_eq!(report.total_present, 3);
        assert_eq!(report.total_absent, 1);
        assert_eq!(report.workers[0].attendance_percentage, 66.67);
        assert_eq!(report.workers[1].attendance_percentage, 100.0);
        assert_eq!(report.attendance_rate, 75.0);
    }

    #[test]
    fn test_payroll_report_totals() {
        let range = DateRange::new(d("2025-03-01"), d("2025-03-31"));
        let workers = vec![worker("a", 500.0), worker("b", 400.0)];
        let attendance = vec![
            mark("a", "2025-03-01", AttendanceStatus::Present),
            mark("b", "2025-03-01", AttendanceStatus::Half),
        ];
        let advances = vec![Advance {
            id: "adv".to_string(),
            worker_id: "a".to_string(),
            amount: 100.0,
            date: d("2025-03-01"),
            created_at: Utc::now(),
        }];

        let report = build_payroll_report(range, &workers, attendance, advances);

        assert_eq!(report.gross_earnings, 700.0);
        assert_eq!(report.total_advances, 100.0);
        assert_eq!(report.net_payable, 600.0);
    }

    #[test]
    fn test_worker_without_records_reports_zero() {
        let range = DateRange::single(d("2025-03-01"));
        let report = build_attendance_report(range, &[worker("a", 500.0)], Vec::new());

        assert_eq!(report.workers[0].attendance_percentage, 0.0);
        assert_eq!(report.attendance_rate, 0.0);
    }
}
