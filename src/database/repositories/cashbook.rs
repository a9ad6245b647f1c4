use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{CashbookEntry, CashbookEntryInput, EntryKind};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CashbookFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub kind: Option<EntryKind>,
    /// Matches description or category, case-insensitive
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct CashbookRepository {
    pool: SqlitePool,
}

impl CashbookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_entry(
        &self,
        user_id: &str,
        input: CashbookEntryInput,
    ) -> Result<CashbookEntry> {
        let entry = sqlx::query_as::<_, CashbookEntry>(
            r#"
            INSERT INTO
                cashbook_entries (
                    id,
                    user_id,
                    date,
                    description,
                    category,
                    kind,
                    amount,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                user_id,
                date,
                description,
                category,
                kind,
                amount,
                created_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(input.date)
        .bind(input.description)
        .bind(input.category)
        .bind(input.kind)
        .bind(input.amount)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn get_entries(
        &self,
        user_id: &str,
        filter: &CashbookFilter,
    ) -> Result<Vec<CashbookEntry>> {
        let pattern = filter
            .search
            .as_deref()
            .map(|term| format!("%{}%", term.to_lowercase()));

        let entries = sqlx::query_as::<_, CashbookEntry>(
            r#"
            SELECT
                id,
                user_id,
                date,
                description,
                category,
                kind,
                amount,
                created_at
            FROM
                cashbook_entries
            WHERE
                user_id = ?
                AND (? IS NULL OR date >= ?)
                AND (? IS NULL OR date <= ?)
                AND (? IS NULL OR kind = ?)
                AND (
                    ? IS NULL
                    OR LOWER(description) LIKE ?
                    OR LOWER(COALESCE(category, '')) LIKE ?
                )
            ORDER BY
                date DESC,
                created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.date_from)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(filter.date_to)
        .bind(filter.kind)
        .bind(filter.kind)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
