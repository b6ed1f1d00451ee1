//! Error types for the ingest engine
//!
//! Parsing has no error type: it degrades instead of failing.
//! These cover the import phase, the schema registry and configuration.

/// A single record or audit write failed
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// Whole-batch import failures
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Import was requested before anything was parsed
    #[error("no rows to import for unit '{unit}'")]
    NoRows { unit: String },

    /// The record collection could not be opened; nothing was written
    #[error("record store unavailable for unit '{unit}': {source}")]
    Unavailable {
        unit: String,
        #[source]
        source: WriteError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("failed to read unit schema file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid unit schema file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} env var missing")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}
