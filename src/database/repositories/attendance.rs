use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::database::models::{
    Attendance, AttendanceStatus, AttendanceToggleResult, SalaryAccrual, Worker,
};
use crate::payroll::{DateRange, accrual_amount, next_status};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Marks a day and refreshes its salary accrual in one transaction.
    pub async fn mark_attendance(
        &self,
        worker: &Worker,
        date: NaiveDate,
        status: AttendanceStatus,
        marked_by: &str,
    ) -> Result<(Attendance, SalaryAccrual)> {
        let mut tx = self.pool.begin().await?;

        let attendance = upsert_attendance(&mut tx, &worker.id, date, status, marked_by).await?;
        let accrual = upsert_accrual(
            &mut tx,
            &worker.id,
            date,
            status,
            accrual_amount(worker.daily_rate, status),
        )
        .await?;

        tx.commit().await?;

        Ok((attendance, accrual))
    }

    /// Applies a status pick with toggle semantics: picking the status
    /// already stored clears the day, including its accrual.
    pub async fn toggle_attendance(
        &self,
        worker: &Worker,
        date: NaiveDate,
        chosen: AttendanceStatus,
        marked_by: &str,
    ) -> Result<AttendanceToggleResult> {
        let mut tx = self.pool.begin().await?;

        let current: Option<AttendanceStatus> =
            sqlx::query_scalar("SELECT status FROM attendance WHERE worker_id = ? AND date = ?")
                .bind(&worker.id)
                .bind(date)
                .fetch_optional(&mut *tx)
                .await?;

        let result = match next_status(current, chosen) {
            Some(status) => {
                let attendance =
                    upsert_attendance(&mut tx, &worker.id, date, status, marked_by).await?;
                let accrual = upsert_accrual(
                    &mut tx,
                    &worker.id,
                    date,
                    status,
                    accrual_amount(worker.daily_rate, status),
                )
                .await?;
                AttendanceToggleResult {
                    worker_id: worker.id.clone(),
                    date,
                    attendance: Some(attendance),
                    accrual: Some(accrual),
                }
            }
            None => {
                sqlx::query("DELETE FROM attendance WHERE worker_id = ? AND date = ?")
                    .bind(&worker.id)
                    .bind(date)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("DELETE FROM salary_accruals WHERE worker_id = ? AND date = ?")
                    .bind(&worker.id)
                    .bind(date)
                    .execute(&mut *tx)
                    .await?;
                AttendanceToggleResult {
                    worker_id: worker.id.clone(),
                    date,
                    attendance: None,
                    accrual: None,
                }
            }
        };

        tx.commit().await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT
                id,
                worker_id,
                date,
                status,
                marked_at,
                marked_by,
                created_at
            FROM
                attendance
            WHERE
                id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Changes the status of an existing record and its accrual.
    pub async fn update_status(
        &self,
        existing: &Attendance,
        daily_rate: f64,
        status: AttendanceStatus,
        marked_by: &str,
    ) -> Result<Attendance> {
        let mut tx = self.pool.begin().await?;

        let attendance = upsert_attendance(
            &mut tx,
            &existing.worker_id,
            existing.date,
            status,
            marked_by,
        )
        .await?;
        upsert_accrual(
            &mut tx,
            &existing.worker_id,
            existing.date,
            status,
            accrual_amount(daily_rate, status),
        )
        .await?;

        tx.commit().await?;

        Ok(attendance)
    }

    /// Records for a worker, newest first. No range returns everything.
    pub async fn get_for_worker(
        &self,
        worker_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Attendance>> {
        let (from, to) = split_range(range);

        let records = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT
                id,
                worker_id,
                date,
                status,
                marked_at,
                marked_by,
                created_at
            FROM
                attendance
            WHERE
                worker_id = ?
                AND (? IS NULL OR date >= ?)
                AND (? IS NULL OR date <= ?)
            ORDER BY
                date DESC
            "#,
        )
        .bind(worker_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Records in range for every worker owned by `user_id`.
    pub async fn get_for_user_in_range(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT
                a.id,
                a.worker_id,
                a.date,
                a.status,
                a.marked_at,
                a.marked_by,
                a.created_at
            FROM
                attendance a
                JOIN workers w ON w.id = a.worker_id
            WHERE
                w.user_id = ?
                AND a.date >= ?
                AND a.date <= ?
            ORDER BY
                a.date ASC
            "#,
        )
        .bind(user_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn get_accruals(
        &self,
        worker_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<SalaryAccrual>> {
        let (from, to) = split_range(range);

        let accruals = sqlx::query_as::<_, SalaryAccrual>(
            r#"
            SELECT
                id,
                worker_id,
                date,
                amount,
                status,
                created_at
            FROM
                salary_accruals
            WHERE
                worker_id = ?
                AND (? IS NULL OR date >= ?)
                AND (? IS NULL OR date <= ?)
            ORDER BY
                date DESC
            "#,
        )
        .bind(worker_id)
        .bind(from)
        .bind(from)
        .bind(to)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(accruals)
    }
}

pub(crate) fn split_range(range: Option<DateRange>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match range {
        Some(range) => (Some(range.from), Some(range.to)),
        None => (None, None),
    }
}

async fn upsert_attendance(
    conn: &mut SqliteConnection,
    worker_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
    marked_by: &str,
) -> Result<Attendance> {
    let now = Utc::now();

    let attendance = sqlx::query_as::<_, Attendance>(
        r#"
        INSERT INTO
            attendance (id, worker_id, date, status, marked_at, marked_by, created_at)
        VALUES
            (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (worker_id, date) DO UPDATE
        SET
            status = excluded.status,
            marked_at = excluded.marked_at,
            marked_by = excluded.marked_by
        RETURNING
            id,
            worker_id,
            date,
            status,
            marked_at,
            marked_by,
            created_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(worker_id)
    .bind(date)
    .bind(status)
    .bind(now)
    .bind(marked_by)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(attendance)
}

async fn upsert_accrual(
    conn: &mut SqliteConnection,
    worker_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
    amount: f64,
) -> Result<SalaryAccrual> {
    let accrual = sqlx::query_as::<_, SalaryAccrual>(
        r#"
        INSERT INTO
            salary_accruals (id, worker_id, date, amount, status, created_at)
        VALUES
            (?, ?, ?, ?, ?, ?)
        ON CONFLICT (worker_id, date) DO UPDATE
        SET
            amount = excluded.amount,
            status = excluded.status
        RETURNING
            id,
            worker_id,
            date,
            amount,
            status,
            created_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(worker_id)
    .bind(date)
    .bind(amount)
    .bind(status)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(accrual)
}
