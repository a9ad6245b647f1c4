use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DateRange;
use crate::database::models::AttendanceStatus;

/// Pay terms of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkerLedger {
    pub daily_rate: f64,
    pub overtime: f64,
    pub other_adjustments: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsSummary {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub daily_rate: f64,
    /// Attendance records falling in the range
    pub total_days: u32,
    /// Records in range that are not holidays
    pub working_days: u32,
    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
    pub holiday_days: u32,
    pub daily_earnings: f64,
    pub overtime: f64,
    pub other_adjustments: f64,
    pub total_advances: f64,
    pub total_earnings: f64,
    pub net_payable: f64,
}

impl WorkerLedger {
    pub fn new(daily_rate: f64) -> Self {
        Self {
            daily_rate,
            overtime: 0.0,
            other_adjustments: 0.0,
        }
    }

    /// Computes earnings for `range`.
    ///
    /// Attendance and advances outside the range are ignored. Overtime and
    /// other adjustments are running totals and are always added in full.
    pub fn summarize<A, V>(&self, range: DateRange, attendance: A, advances: V) -> EarningsSummary
    where
        A: IntoIterator<Item = (NaiveDate, AttendanceStatus)>,
        V: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut summary = EarningsSummary {
            date_from: range.from,
            date_to: range.to,
            daily_rate: self.daily_rate,
            total_days: 0,
            working_days: 0,
            present_days: 0,
            half_days: 0,
            absent_days: 0,
            holiday_days: 0,
            daily_earnings: 0.0,
            overtime: self.overtime,
            other_adjustments: self.other_adjustments,
            total_advances: 0.0,
            total_earnings: 0.0,
            net_payable: 0.0,
        };

        for (date, status) in attendance {
            if !range.contains(date) {
                continue;
            }
            summary.total_days += 1;
            match status {
                AttendanceStatus::Present => summary.present_days += 1,
                AttendanceStatus::Half => summary.half_days += 1,
                AttendanceStatus::Absent => summary.absent_days += 1,
                AttendanceStatus::Holiday => summary.holiday_days += 1,
            }
        }
        summary.working_days = summary.total_days - summary.holiday_days;

        summary.daily_earnings = self.daily_rate * f64::from(summary.present_days)
            + self.daily_rate * 0.5 * f64::from(summary.half_days);

        summary.total_advances = advances
            .into_iter()
            .filter(|(date, _)| range.contains(*date))
            .map(|(_, amount)| amount)
            .sum();

        summary.total_earnings = summary.daily_earnings + self.overtime + self.other_adjustments;
        summary.net_payable = summary.total_earnings - summary.total_advances;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn january() -> DateRange {
        DateRange::new(d("2025-01-01"), d("2025-01-31"))
    }

    fn marks(start: &str, statuses: &[AttendanceStatus]) -> Vec<(NaiveDate, AttendanceStatus)> {
        let start = d(start);
        statuses
            .iter()
            .enumerate()
            .map(|(i, s)| (start + Duration::days(i as i64), *s))
            .collect()
    }

    #[test]
    fn test_reference_payroll_example() {
        let mut statuses = vec![AttendanceStatus::Present; 18];
        statuses.extend([AttendanceStatus::Half; 2]);
        let ledger = WorkerLedger {
            daily_rate: 500.0,
            overtime: 200.0,
            other_adjustments: -100.0,
        };
        let advances = vec![(d("2025-01-05"), 1000.0), (d("2025-01-15"), 500.0)];

        let summary = ledger.summarize(january(), marks("2025-01-02", &statuses), advances);

        assert_eq!(summary.present_days, 18);
        assert_eq!(summary.half_days, 2);
        assert_eq!(summary.daily_earnings, 9500.0);
        assert_eq!(summary.total_advances, 1500.0);
        assert_eq!(summary.total_earnings, 9600.0);
        assert_eq!(summary.net_payable, 8100.0);
    }

    #[test]
    fn test_absent_and_holiday_earn_nothing() {
        let ledger = WorkerLedger::new(600.0);
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::Holiday,
            AttendanceStatus::Half,
        ];

        let summary = ledger.summarize(january(), marks("2025-01-10", &statuses), vec![]);

        assert_eq!(summary.daily_earnings, 900.0);
        assert_eq!(summary.total_days, 4);
        assert_eq!(summary.working_days, 3);
        assert_eq!(summary.absent_days, 1);
        assert_eq!(summary.holiday_days, 1);
    }

    #[test]
    fn test_records_outside_range_are_ignored() {
        let ledger = WorkerLedger::new(500.0);
        let attendance = vec![
            (d("2024-12-31"), AttendanceStatus::Present),
            (d("2025-01-01"), AttendanceStatus::Present),
            (d("2025-02-01"), AttendanceStatus::Present),
        ];
        let advances = vec![(d("2024-12-31"), 300.0), (d("2025-01-20"), 200.0)];

        let summary = ledger.summarize(january(), attendance, advances);

        assert_eq!(summary.present_days, 1);
        assert_eq!(summary.total_advances, 200.0);
        assert_eq!(summary.net_payable, 300.0);
    }

    #[test]
    fn test_empty_range_yields_zero_earnings() {
        let ledger = WorkerLedger::new(500.0);
        let range = DateRange::new(d("2025-01-31"), d("2025-01-01"));
        let attendance = marks("2025-01-01", &[AttendanceStatus::Present; 31]);

        let summary = ledger.summarize(range, attendance, vec![(d("2025-01-10"), 100.0)]);

        assert_eq!(summary.daily_earnings, 0.0);
        assert_eq!(summary.total_advances, 0.0);
        assert_eq!(summary.total_days, 0);
    }

    #[test]
    fn test_running_totals_apply_regardless_of_range() {
        let ledger = WorkerLedger {
            daily_rate: 350.0,
            overtime: 150.0,
            other_adjustments: 0.0,
        };

        let summary = ledger.summarize(january(), Vec::new(), Vec::new());

        assert_eq!(summary.daily_earnings, 0.0);
        assert_eq!(summary.total_earnings, 150.0);
        assert_eq!(summary.net_payable, 150.0);
    }
}
