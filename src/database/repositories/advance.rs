use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::attendance::split_range;
use crate::database::models::{Advance, AdvanceInput};
use crate::payroll::DateRange;

#[derive(Clone)]
pub struct AdvanceRepository {
    pool: SqlitePool,
}

impl AdvanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_advance(&self, input: &AdvanceInput) -> Result<Advance> {
        let advance = sqlx::query_as::<_, Advance>(
            r#"
            INSERT INTO
                advances (id, worker_id, amount, date, created_at)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id,
                worker_id,
                amount,
                date,
                created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.worker_id)
        .bind(input.amount)
        .bind(input.date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(advance)
    }

    /// Advances for a worker, newest first.
    pub async fn get_for_worker(
        &self,
        worker_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Advance>> {
        let (from, to) = split_range(range);

        let advances = sqlx::query_as::<_, Advance>(
            r#"
            SELECT
                id,
                worker_id,
                amount,
                date,
                created_at
            FROM
                advances
            WHERE
                worker_id = ?
                AND (? IS NULL OR date >= ?)
                AND (? IS NULL OR date <= ?)
            ORDER BY
                date DESC,
                created_at DESC
            "#,
        )
        .bind(worker_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(advances)
    }

    /// Sum of advances a worker took on `date`.
    pub async fn total_for_day(&self, worker_id: &str, date: NaiveDate) -> Result<f64> {
        let total: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM advances WHERE worker_id = ? AND date = ?",
        )
        .bind(worker_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn get_for_user_in_range(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Advance>> {
        let advances = sqlx::query_as::<_, Advance>(
            r#"
            SELECT
                a.id,
                a.worker_id,
                a.amount,
                a.date,
                a.created_at
            FROM
                advances a
                JOIN workers w ON w.id = a.worker_id
            WHERE
                w.user_id = ?
                AND a.date >= ?
                AND a.date <= ?
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(advances)
    }
}
