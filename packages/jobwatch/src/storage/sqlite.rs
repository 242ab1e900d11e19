//! SQLite persistence.
//!
//! A single-file database holding subscriptions and the seen-job record.
//! Duplicate inserts are expected races and handled with `INSERT OR
//! IGNORE`; the first record always wins.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::traits::{SeenJobStore, SubscriptionIndex};
use crate::types::{normalize_keyword, JobPosting, SubscriberId};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `database_url` and apply migrations.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite:job_alerts.db?mode=rwc` - File, created if absent
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// In-memory database for tests.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subscriber_id INTEGER NOT NULL,
                keyword TEXT NOT NULL,
                UNIQUE(subscriber_id, keyword)
            );

            CREATE INDEX IF NOT EXISTS idx_subscriptions_keyword ON subscriptions(keyword);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                job_id TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                company TEXT,
                link TEXT NOT NULL,
                source TEXT NOT NULL,
                first_seen_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Register a subscription. Returns false when the (subscriber, keyword)
    /// pair already exists.
    pub async fn add_subscription(
        &self,
        subscriber: SubscriberId,
        keyword: &str,
    ) -> Result<bool, StoreError> {
        let keyword = normalize_keyword(keyword);
        let result =
            sqlx::query("INSERT OR IGNORE INTO subscriptions (subscriber_id, keyword) VALUES (?1, ?2)")
                .bind(subscriber.0)
                .bind(&keyword)
                .execute(&self.pool)
                .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            info!(subscriber = %subscriber, keyword, "subscription added");
        } else {
            warn!(subscriber = %subscriber, keyword, "subscription already exists");
        }
        Ok(inserted)
    }

    /// Remove a subscription. Returns false when it did not exist.
    pub async fn remove_subscription(
        &self,
        subscriber: SubscriberId,
        keyword: &str,
    ) -> Result<bool, StoreError> {
        let keyword = normalize_keyword(keyword);
        let result = sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = ?1 AND keyword = ?2")
            .bind(subscriber.0)
            .bind(&keyword)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(subscriber = %subscriber, keyword, "subscription removed");
        }
        Ok(removed)
    }

    /// Keywords one subscriber has registered, sorted.
    pub async fn subscriptions_for(
        &self,
        subscriber: SubscriberId,
    ) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT keyword FROM subscriptions WHERE subscriber_id = ?1 ORDER BY keyword")
                .bind(subscriber.0)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(keyword,)| keyword).collect())
    }
}

#[async_trait]
impl SubscriptionIndex for SqliteStore {
    async fn all_keywords(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT keyword FROM subscriptions ORDER BY keyword")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(keyword,)| keyword).collect())
    }

    async fn subscribers_for(&self, keyword: &str) -> Result<Vec<SubscriberId>, StoreError> {
        let keyword = normalize_keyword(keyword);
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT subscriber_id FROM subscriptions WHERE keyword = ?1 ORDER BY subscriber_id",
        )
        .bind(&keyword)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| SubscriberId(id)).collect())
    }
}

#[async_trait]
impl SeenJobStore for SqliteStore {
    async fn is_seen(&self, job_id: &str) -> Result<bool, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM jobs WHERE job_id = ?1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn mark_seen(&self, job: &JobPosting) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO jobs (job_id, title, company, link, source, first_seen_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.link)
        .bind(&job.source)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(job_id = %job.id, "job already marked seen");
        }
        Ok(())
    }
}
