use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Plan, Subscription, SubscriptionStatus};

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: SqlitePool,
}

impl SubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_for_user(&self, user_id: &str) -> Result<Option<Subscription>> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT
                user_id,
                plan,
                status,
                updated_at
            FROM
                subscriptions
            WHERE
                user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    pub async fn upsert(
        &self,
        user_id: &str,
        plan: Plan,
        status: SubscriptionStatus,
    ) -> Result<Subscription> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO
                subscriptions (user_id, plan, status, updated_at)
            VALUES
                (?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE
            SET
                plan = excluded.plan,
                status = excluded.status,
                updated_at = excluded.updated_at
            RETURNING
                user_id,
                plan,
                status,
                updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }
}
