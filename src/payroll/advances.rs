use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PayrollError;

/// Checks an advance against the worker's optional limit.
pub fn validate_advance(amount: f64, limit: Option<f64>) -> Result<(), PayrollError> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(PayrollError::NonPositiveAmount(amount));
    }
    match limit {
        Some(limit) if amount > limit => Err(PayrollError::AdvanceLimitExceeded { amount, limit }),
        _ => Ok(()),
    }
}

/// Sum of advances dated `day`.
pub fn today_total<I>(advances: I, day: NaiveDate) -> f64
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    advances
        .into_iter()
        .filter(|(date, _)| *date == day)
        .map(|(_, amount)| amount)
        .sum()
}

/// Running total of advances handed out on the current calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TodayAdvance {
    pub day: NaiveDate,
    pub total: f64,
}

impl TodayAdvance {
    pub fn new(day: NaiveDate) -> Self {
        Self { day, total: 0.0 }
    }

    /// Resets the total when `today` is a later day than the one tracked.
    /// Returns true only on the call that crosses the boundary.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if today > self.day {
            self.day = today;
            self.total = 0.0;
            true
        } else {
            false
        }
    }

    /// Adds an advance dated `date`. Advances for other days leave the
    /// total untouched.
    pub fn add(&mut self, date: NaiveDate, amount: f64) {
        self.roll_over(date);
        if date == self.day {
            self.total += amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_validate_advance() {
        assert!(validate_advance(100.0, None).is_ok());
        assert!(validate_advance(5000.0, Some(5000.0)).is_ok());
        assert_eq!(
            validate_advance(0.0, None),
            Err(PayrollError::NonPositiveAmount(0.0))
        );
        assert!(validate_advance(-5.0, Some(100.0)).is_err());
        assert!(validate_advance(f64::NAN, None).is_err());
        assert_eq!(
            validate_advance(5001.0, Some(5000.0)),
            Err(PayrollError::AdvanceLimitExceeded {
                amount: 5001.0,
                limit: 5000.0
            })
        );
    }

    #[test]
    fn test_today_total_sums_same_day_only() {
        let advances = vec![
            (d("2025-01-10"), 200.0),
            (d("2025-01-10"), 300.0),
            (d("2025-01-09"), 1000.0),
        ];
        assert_eq!(today_total(advances, d("2025-01-10")), 500.0);
    }

    #[test]
    fn test_roll_over_resets_once_per_boundary() {
        let mut tracker = TodayAdvance::new(d("2025-01-10"));
        tracker.add(d("2025-01-10"), 400.0);
        assert_eq!(tracker.total, 400.0);

        assert!(!tracker.roll_over(d("2025-01-10")));
        assert_eq!(tracker.total, 400.0);

        assert!(tracker.roll_over(d("2025-01-11")));
        assert_eq!(tracker.total, 0.0);
        assert!(!tracker.roll_over(d("2025-01-11")));

        tracker.add(d("2025-01-11"), 50.0);
        assert!(!tracker.roll_over(d("2025-01-11")));
        assert_eq!(tracker.total, 50.0);
    }

    #[test]
    fn test_add_for_new_day_starts_fresh_total() {
        let mut tracker = TodayAdvance::new(d("2025-01-10"));
        tracker.add(d("2025-01-10"), 400.0);
        tracker.add(d("2025-01-12"), 100.0);
        assert_eq!(tracker.day, d("2025-01-12"));
        assert_eq!(tracker.total, 100.0);

        tracker.add(d("2025-01-11"), 999.0);
        assert_eq!(tracker.total, 100.0);
    }
}
