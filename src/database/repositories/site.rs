use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CreateSiteInput, Site};

#[derive(Clone)]
pub struct SiteRepository {
    pool: SqlitePool,
}

impl SiteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_site(&self, user_id: &str, input: CreateSiteInput) -> Result<Site> {
        let site = sqlx::query_as::<_, Site>(
            r#"
            INSERT INTO
                sites (id, name, location, user_id, created_at)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id,
                name,
                location,
                user_id,
                created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(input.name)
        .bind(input.location)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(site)
    }

    pub async fn get_sites_for_user(&self, user_id: &str) -> Result<Vec<Site>> {
        let sites = sqlx::query_as::<_, Site>(
            r#"
            SELECT
                id,
                name,
                location,
                user_id,
                created_at
            FROM
                sites
            WHERE
                user_id = ?
            ORDER BY
                created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sites)
    }

    pub async fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sites WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
