use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::database::models::{
    AttendanceStatus, DEFAULT_DAILY_RATE, Plan, SubscriptionStatus, UserInfo,
};
use crate::payroll::{DateRange, EarningsSummary, WorkerLedger, is_expired};

/// The local worker blob, keyed by worker id.
pub type WorkerMap = BTreeMap<String, LocalWorker>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalAttendance {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(with = "epoch_millis")]
    pub marked_at: DateTime<Utc>,
}

/// `markedAt` is written as epoch milliseconds. Older blobs may carry an
/// RFC3339 string, which is still accepted on read.
mod epoch_millis {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stamp {
        Millis(i64),
        Text(DateTime<Utc>),
    }

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        match Stamp::deserialize(deserializer)? {
            Stamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| D::Error::custom(format!("markedAt out of range: {}", ms))),
            Stamp::Text(at) => Ok(at),
        }
    }
}

impl LocalAttendance {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(self.marked_at, now)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalSalary {
    pub date: NaiveDate,
    pub amount: f64,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalAdvance {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalPayment {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// One worker inside the blob. Entries may be created sparsely (just an
/// attendance list, or just a hidden flag), so every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalWorker {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub site: Option<String>,
    pub daily_rate: Option<f64>,
    pub attendance: Vec<LocalAttendance>,
    pub salary: Vec<LocalSalary>,
    pub advances: Vec<LocalAdvance>,
    pub overtime: f64,
    pub other_adjustments: f64,
    pub payments: Vec<LocalPayment>,
    pub hidden: bool,
}

impl LocalWorker {
    pub fn status_on(&self, date: NaiveDate) -> Option<AttendanceStatus> {
        self.attendance
            .iter()
            .find(|a| a.date == date)
            .map(|a| a.status)
    }

    pub fn salary_on(&self, date: NaiveDate) -> Option<&LocalSalary> {
        self.salary.iter().find(|s| s.date == date)
    }

    pub fn ledger(&self) -> WorkerLedger {
        WorkerLedger {
            daily_rate: self.daily_rate.unwrap_or(DEFAULT_DAILY_RATE),
            overtime: self.overtime,
            other_adjustments: self.other_adjustments,
        }
    }

    pub fn summarize(&self, range: DateRange) -> EarningsSummary {
        self.ledger().summarize(
            range,
            self.attendance.iter().map(|a| (a.date, a.status)),
            self.advances.iter().map(|a| (a.date, a.amount)),
        )
    }

    /// Insert or replace the mark for `date`.
    pub(crate) fn upsert_attendance(&mut self, record: LocalAttendance) {
        match self.attendance.iter_mut().find(|a| a.date == record.date) {
            Some(existing) => *existing = record,
            None => self.attendance.push(record),
        }
    }

    pub(crate) fn upsert_salary(&mut self, record: LocalSalary) {
        match self.salary.iter_mut().find(|s| s.date == record.date) {
            Some(existing) => *existing = record,
            None => self.salary.push(record),
        }
    }

    pub(crate) fn clear_day(&mut self, date: NaiveDate) {
        self.attendance.retain(|a| a.date != date);
        self.salary.retain(|s| s.date != date);
    }
}

/// Worker created while the backend was unreachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub site_id: String,
    pub daily_rate: f64,
    pub max_advance_limit: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSubscription {
    pub plan: Plan,
    pub status: SubscriptionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_sparse_entry_deserializes_with_defaults() {
        let worker: LocalWorker = serde_json::from_str(r#"{"hidden":true}"#).unwrap();
        assert!(worker.hidden);
        assert!(worker.attendance.is_empty());
        assert_eq!(worker.ledger().daily_rate, DEFAULT_DAILY_RATE);
    }

    #[test]
    fn test_blob_uses_camel_case_keys() {
        let mut worker = LocalWorker::default();
        worker.daily_rate = Some(450.0);
        worker.upsert_attendance(LocalAttendance {
            date: d("2025-01-02"),
            status: AttendanceStatus::Half,
            marked_at: Utc::now(),
        });

        let json = serde_json::to_value(&worker).unwrap();
        assert_eq!(json["dailyRate"], 450.0);
        assert_eq!(json["attendance"][0]["status"], "half");
        assert!(json["attendance"][0]["markedAt"].is_i64());
    }

    #[test]
    fn test_marked_at_reads_millis_and_rfc3339() {
        let from_millis: LocalAttendance = serde_json::from_str(
            r#"{"date":"2025-01-01","status":"present","markedAt":1735689600000}"#,
        )
        .unwrap();
        let from_text: LocalAttendance = serde_json::from_str(
            r#"{"date":"2025-01-01","status":"present","markedAt":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(from_millis.marked_at, from_text.marked_at);
        assert_eq!(
            serde_json::to_value(&from_text).unwrap()["markedAt"],
            1735689600000_i64
        );
    }

    #[test]
    fn test_upsert_keeps_one_record_per_day() {
        let mut worker = LocalWorker::default();
        for status in [AttendanceStatus::Present, AttendanceStatus::Absent] {
            worker.upsert_attendance(LocalAttendance {
                date: d("2025-01-02"),
                status,
                marked_at: Utc::now(),
            });
        }

        assert_eq!(worker.attendance.len(), 1);
        assert_eq!(worker.status_on(d("2025-01-02")), Some(AttendanceStatus::Absent));
    }

    #[test]
    fn test_mark_expiry() {
        let marked_at = Utc::now() - Duration::hours(25);
        let record = LocalAttendance {
            date: d("2025-01-02"),
            status: AttendanceStatus::Present,
            marked_at,
        };
        assert!(record.is_expired(Utc::now()));
        assert!(!record.is_expired(marked_at + Duration::hours(1)));
    }
}
