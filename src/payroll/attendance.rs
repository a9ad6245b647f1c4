use chrono::{DateTime, Duration, Utc};

use crate::database::models::AttendanceStatus;

/// How long a mark stays "fresh" for display.
pub const MARK_EXPIRY_HOURS: i64 = 24;

/// Status after the user picks `chosen` on a day currently marked
/// `current`. Picking the status already set clears the day.
pub fn next_status(
    current: Option<AttendanceStatus>,
    chosen: AttendanceStatus,
) -> Option<AttendanceStatus> {
    match current {
        Some(existing) if existing == chosen => None,
        _ => Some(chosen),
    }
}

/// Fraction of the daily rate a status earns.
pub fn day_weight(status: AttendanceStatus) -> f64 {
    match status {
        AttendanceStatus::Present => 1.0,
        AttendanceStatus::Half => 0.5,
        AttendanceStatus::Absent | AttendanceStatus::Holiday => 0.0,
    }
}

/// Same-day salary accrual for a status.
pub fn accrual_amount(daily_rate: f64, status: AttendanceStatus) -> f64 {
    daily_rate * day_weight(status)
}

/// A mark is expired once strictly more than 24 hours have passed.
/// Expiry only affects presentation; the stored status is unchanged.
pub fn is_expired(marked_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(marked_at) > Duration::hours(MARK_EXPIRY_HOURS)
}
