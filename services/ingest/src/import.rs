//! Import orchestrator
//!
//! Writes parsed rows one at a time to a [`RecordSink`], tallies the
//! outcome and leaves a single [`AuditEntry`]. A failed row never aborts
//! the batch; only an unavailable sink or an empty batch does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ImportError, WriteError};
use crate::rows::ParsedRow;

/// Provenance tag stamped on every imported record
pub const SOURCE_TAG: &str = "bulk-import";

pub const AUDIT_ACTION: &str = "BULK_IMPORT";

/// Destination for imported records, one collection per unit
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Check the unit's collection can be written to
    async fn open(&self, unit: &str) -> Result<(), WriteError>;

    async fn write(&self, record: &NewRecord) -> Result<(), WriteError>;
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<(), WriteError>;
}

/// One write request: the parsed fields plus provenance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(skip)]
    pub unit: String,
    #[serde(flatten)]
    pub fields: ParsedRow,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub source: &'static str,
}

impl NewRecord {
    pub fn new(unit: &str, fields: ParsedRow, created_by: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            unit: unit.to_string(),
            fields,
            created_at,
            created_by: created_by.to_string(),
            source: SOURCE_TAG,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub action: &'static str,
    pub user_id: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// Tally of one import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub unit: String,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub message: String,
}

impl ImportSummary {
    fn new(unit: &str, attempted: usize, succeeded: usize) -> Self {
        let failed = attempted - succeeded;
        let message = if failed == 0 {
            format!("Successfully imported {} records.", succeeded)
        } else {
            format!(
                "Imported {} of {} records; {} failed.",
                succeeded, attempted, failed
            )
        };
        Self {
            unit: unit.to_string(),
            attempted,
            succeeded,
            failed,
            message,
        }
    }

    fn audit_details(&self) -> String {
        format!(
            "Imported {} of {} rows into {} ({} failed)",
            self.succeeded, self.attempted, self.unit, self.failed
        )
    }
}

/// Persist `rows` for `unit` on behalf of `caller`.
///
/// Rows are written sequentially in input order. Per-row failures are
/// counted, not raised. The audit entry is best-effort.
pub async fn import_rows(
    sink: &dyn RecordSink,
    audit: &dyn AuditLog,
    unit: &str,
    rows: &[ParsedRow],
    caller: &str,
) -> Result<ImportSummary, ImportError> {
    if rows.is_empty() {
        return Err(ImportError::NoRows {
            unit: unit.to_string(),
        });
    }

    sink.open(unit)
        .await
        .map_err(|source| ImportError::Unavailable {
            unit: unit.to_string(),
            source,
        })?;

    let mut outcomes: Vec<Result<(), WriteError>> = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let record = NewRecord::new(unit, row.clone(), caller, Utc::now());
        let outcome = sink.write(&record).await;
        if let Err(e) = &outcome {
            warn!(unit, row = idx + 1, error = %e, "row write failed");
        }
        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    let summary = ImportSummary::new(unit, rows.len(), succeeded);

    let entry = AuditEntry {
        action: AUDIT_ACTION,
        user_id: caller.to_string(),
        details: summary.audit_details(),
        created_at: Utc::now(),
    };
    if let Err(e) = audit.append(&entry).await {
        warn!(unit, error = %e, "audit log append failed");
    }

    info!(
        unit,
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "import finished"
    );
    Ok(summary)
}
