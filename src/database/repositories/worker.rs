use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{
    CreateWorkerInput, DEFAULT_DAILY_RATE, DEFAULT_SITE, UpdateWorkerInput, Worker, WorkerStatus,
};

#[derive(Debug, Clone, Default)]
pub struct WorkerFilter {
    pub site_id: Option<String>,
    /// Case-insensitive match on name, substring match on phone
    pub search: Option<String>,
    pub include_hidden: bool,
}

#[derive(Clone)]
pub struct WorkerRepository {
    pool: SqlitePool,
}

impl WorkerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_worker(&self, user_id: &str, input: CreateWorkerInput) -> Result<Worker> {
        let now = Utc::now();

        let worker = sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO
                workers (
                    id,
                    user_id,
                    name,
                    phone,
                    role,
                    site_id,
                    daily_rate,
                    max_advance_limit,
                    overtime,
                    other_adjustments,
                    hidden,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, 0, 0, 0, ?, ?, ?)
            RETURNING
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(input.name)
        .bind(input.phone)
        .bind(input.role)
        .bind(input.site_id.unwrap_or_else(|| DEFAULT_SITE.to_string()))
        .bind(input.daily_rate.unwrap_or(DEFAULT_DAILY_RATE))
        .bind(input.max_advance_limit)
        .bind(WorkerStatus::Active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(worker)
    }

    pub async fn get_workers(&self, user_id: &str, filter: &WorkerFilter) -> Result<Vec<Worker>> {
        let pattern = filter
            .search
            .as_deref()
            .map(|term| format!("%{}%", term.to_lowercase()));

        let workers = sqlx::query_as::<_, Worker>(
            r#"
            SELECT
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            FROM
                workers
            WHERE
                user_id = ?
                AND (? IS NULL OR site_id = ?)
                AND (? IS NULL OR LOWER(name) LIKE ? OR phone LIKE ?)
                AND (? OR hidden = 0)
            ORDER BY
                created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(&filter.site_id)
        .bind(&filter.site_id)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(filter.include_hidden)
        .fetch_all(&self.pool)
        .await?;

        Ok(workers)
    }

    /// Looks a worker up, scoped to its owner.
    pub async fn find_for_user(&self, id: &str, user_id: &str) -> Result<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            SELECT
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            FROM
                workers
            WHERE
                id = ?
                AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(worker)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Worker>> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            SELECT
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            FROM
                workers
            WHERE
                id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(worker)
    }

    pub async fn update_worker(&self, id: &str, input: UpdateWorkerInput) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET
                name = COALESCE(?, name),
                phone = COALESCE(?, phone),
                role = COALESCE(?, role),
                site_id = COALESCE(?, site_id),
                daily_rate = COALESCE(?, daily_rate),
                max_advance_limit = COALESCE(?, max_advance_limit),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(input.name)
        .bind(input.phone)
        .bind(input.role)
        .bind(input.site_id)
        .bind(input.daily_rate)
        .bind(input.max_advance_limit)
        .bind(input.status)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(worker)
    }

    pub async fn set_hidden(&self, id: &str, hidden: bool) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET
                hidden = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(hidden)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(worker)
    }

    /// Adds `amount` to the running overtime total.
    pub async fn add_overtime(&self, id: &str, amount: f64) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET
                overtime = overtime + ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(worker)
    }

    /// Adds `amount` (possibly negative) to the running adjustment total.
    pub async fn add_adjustment(&self, id: &str, amount: f64) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET
                other_adjustments = other_adjustments + ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                user_id,
                name,
                phone,
                role,
                site_id,
                daily_rate,
                max_advance_limit,
                overtime,
                other_adjustments,
                hidden,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(worker)
    }

    pub async fn delete_worker(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM workers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workers WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
