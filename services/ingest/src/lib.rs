//! Bulk Ingest - Turns copy-pasted spreadsheet text into regulatory records
//!
//! Responsibilities:
//! - Split pasted tab-delimited text into cells
//! - Find the real data section (skip titles, province headings, footnotes)
//! - Normalize each row for its unit schema (dates, fees, provinces)
//! - Persist rows one at a time and leave an audit trail
//!
//! Parsing is pure and never fails: anomalies degrade to omission or to the
//! original text. Only the import phase reports errors.

pub mod config;
pub mod date;
pub mod error;
pub mod import;
pub mod parsers;
pub mod paste;
pub mod province;
pub mod registry;
pub mod rows;
pub mod section;
pub mod store;

pub use config::Config;
pub use error::{ConfigError, ImportError, RegistryError, WriteError};
pub use import::{import_rows, AuditEntry, AuditLog, ImportSummary, NewRecord, RecordSink};
pub use parsers::{parser_for, RowParser};
pub use registry::{parse_paste, ParseOutcome, UnitRegistry};
pub use rows::ParsedRow;

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
