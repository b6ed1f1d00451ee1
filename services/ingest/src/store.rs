//! Postgres-backed record sink and audit log

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::WriteError;
use crate::import::{AuditEntry, AuditLog, NewRecord, RecordSink};

/// Reachability check for the records table; touches at most one row
const OPEN_CHECK_SQL: &str = "SELECT 1 FROM records LIMIT 1";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self, WriteError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl RecordSink for PgStore {
    async fn open(&self, unit: &str) -> Result<(), WriteError> {
        sqlx::query(OPEN_CHECK_SQL).fetch_optional(&self.pool).await?;
        debug!(unit, "record store ready");
        Ok(())
    }

    async fn write(&self, record: &NewRecord) -> Result<(), WriteError> {
        let fields = serde_json::to_value(&record.fields)?;
        sqlx::query(
            r#"
            INSERT INTO records (record_id, unit, fields, created_at, created_by, source)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.unit)
        .bind(fields)
        .bind(record.created_at)
        .bind(&record.created_by)
        .bind(record.source)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for PgStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), WriteError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (log_id, action, user_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.action)
        .bind(&entry.user_id)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
