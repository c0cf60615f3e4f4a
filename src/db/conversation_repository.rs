use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::{error, info};

use crate::config::RelayConfig;
use crate::db::ConversationStore;
use crate::errors::AppError;
use crate::models::ConversationRecord;

/// Postgres-backed conversation log. One table, named after the configured collection.
#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
    table: String,
}

impl ConversationRepository {
    /// Opens the pool and makes sure the collection table exists.
    pub async fn connect(config: &RelayConfig) -> Result<Self, AppError> {
        let table = validate_identifier(&config.store_collection)?;

        let options = PgConnectOptions::from_str(&config.store_url)
            .map_err(|e| AppError::db_query("Invalid store URL", e))?
            .database(&config.store_database);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::db_query("Failed to connect to conversation store", e))?;

        let repo = Self { pool, table };
        repo.ensure_schema().await?;
        info!(
            "Connected to conversation store {}/{}",
            config.store_database, repo.table
        );
        Ok(repo)
    }

    async fn ensure_schema(&self) -> Result<(), AppError> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 id         BIGSERIAL PRIMARY KEY,
                 user_text  TEXT NOT NULL,
                 bot_text   TEXT NOT NULL,
                 created_at TIMESTAMPTZ NOT NULL
             )",
            table = self.table
        );
        sqlx::query(&ddl).execute(&self.pool).await.map_err(|e| {
            error!("Failed to create table {}: {e}", self.table);
            AppError::db_query("Failed to prepare conversation table", e)
        })?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ConversationStore for ConversationRepository {
    async fn insert(&self, record: &ConversationRecord) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (user_text, bot_text, created_at) VALUES ($1, $2, $3)",
            self.table
        );
        sqlx::query(&sql)
            .bind(&record.user_text)
            .bind(&record.bot_text)
            .bind(record.timestamp)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to save conversation record: {e}");
                AppError::db_query("Failed to save conversation record", e)
            })?;
        Ok(())
    }

    async fn find_recent(&self, limit: i64) -> Result<Vec<ConversationRecord>, AppError> {
        let sql = format!(
            "SELECT user_text, bot_text, created_at AS \"timestamp\"
             FROM {}
             ORDER BY created_at DESC, id DESC
             LIMIT $1",
            self.table
        );
        sqlx::query_as::<_, ConversationRecord>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch conversation history: {e}");
                AppError::db_query("Failed to fetch conversation history", e)
            })
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted.
fn validate_identifier(name: &str) -> Result<String, AppError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name.to_string())
    } else {
        Err(AppError::db_query(
            format!("Invalid collection name '{name}'"),
            sqlx::Error::Configuration(format!("invalid table name: {name}").into()),
        ))
    }
}
