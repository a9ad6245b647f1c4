use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Payment, PaymentInput};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a payout. A missing date defaults to `today`.
    pub async fn create_payment(&self, input: &PaymentInput, today: NaiveDate) -> Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO
                payments (id, worker_id, date, amount, period_from, period_to, created_at)
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                worker_id,
                date,
                amount,
                period_from,
                period_to,
                created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.worker_id)
        .bind(input.date.unwrap_or(today))
        .bind(input.amount)
        .bind(input.period_from)
        .bind(input.period_to)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn get_for_worker(&self, worker_id: &str) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT
                id,
                worker_id,
                date,
                amount,
                period_from,
                period_to,
                created_at
            FROM
                payments
            WHERE
                worker_id = ?
            ORDER BY
                date DESC,
                created_at DESC
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
