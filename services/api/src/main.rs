//! API Service - Preview and import endpoints for bulk ingest
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /units - Registered units and their fields
//! - POST /preview - Parse a paste without saving anything
//! - POST /import - Persist previously previewed rows

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use ingest::store::PgStore;
use ingest::{
    import_rows, parse_paste, AuditLog, Config, ImportError, ParsedRow, RecordSink,
    RegistryError, UnitRegistry,
};

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
struct AppState {
    registry: Arc<UnitRegistry>,
    sink: Arc<dyn RecordSink>,
    audit: Arc<dyn AuditLog>,
    default_province: String,
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

#[derive(Serialize)]
struct UnitInfo {
    unit: String,
    parser: &'static str,
    fields: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    unit: String,
    text: String,
    #[serde(default)]
    default_province: Option<String>,
}

#[derive(Serialize)]
struct PreviewResponse {
    unit: String,
    count: usize,
    rows: Vec<ParsedRow>,
    warning: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest {
    unit: String,
    rows: Vec<ParsedRow>,
    created_by: String,
}

#[derive(Serialize)]
struct ImportResponse {
    succeeded: usize,
    failed: usize,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn import_error_status(err: &ImportError) -> StatusCode {
    match err {
        ImportError::NoRows { .. } => StatusCode::BAD_REQUEST,
        ImportError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn unit_listing(registry: &UnitRegistry) -> Vec<UnitInfo> {
    registry
        .units()
        .map(|(unit, fields)| UnitInfo {
            unit: unit.to_string(),
            parser: if UnitRegistry::is_custom(unit) {
                "custom"
            } else {
                "generic"
            },
            fields: fields.to_vec(),
        })
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn units_handler(State(state): State<AppState>) -> Json<Vec<UnitInfo>> {
    Json(unit_listing(&state.registry))
}

async fn preview_handler(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Response {
    let default_province = req
        .default_province
        .as_deref()
        .unwrap_or(state.default_province.as_str());

    match parse_paste(&state.registry, &req.unit, &req.text, default_province) {
        Ok(outcome) => Json(PreviewResponse {
            unit: outcome.unit,
            count: outcome.rows.len(),
            rows: outcome.rows,
            warning: outcome.warning,
        })
        .into_response(),
        Err(e @ RegistryError::UnknownUnit(_)) => error_response(StatusCode::NOT_FOUND, e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

async fn import_handler(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Response {
    if state.registry.fields(&req.unit).is_none() {
        return error_response(
            StatusCode::NOT_FOUND,
            RegistryError::UnknownUnit(req.unit),
        );
    }

    let result = import_rows(
        state.sink.as_ref(),
        state.audit.as_ref(),
        &req.unit,
        &req.rows,
        &req.created_by,
    )
    .await;

    match result {
        Ok(summary) => Json(ImportResponse {
            succeeded: summary.succeeded,
            failed: summary.failed,
            message: summary.message,
        })
        .into_response(),
        Err(e) => {
            warn!(unit = %req.unit, error = %e, "import rejected");
            error_response(import_error_status(&e), e)
        }
    }
}

fn router(state: AppState) -> Router {
    // CORS for web frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/units", get(units_handler))
        .route("/preview", post(preview_handler))
        .route("/import", post(import_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    ingest::init_tracing();

    let config = Config::from_env().context("Invalid environment configuration")?;
    let db_url = config.db_url().context("DB_URL env var missing")?;

    println!("=== Bulk Ingest API ===");
    println!("Connecting to database...");

    let store = Arc::new(
        PgStore::connect(db_url, config.max_connections)
            .await
            .context("Failed to connect to database")?,
    );

    println!("Database connected");

    let registry = config
        .load_registry()
        .await
        .context("Failed to load unit schema")?;
    info!(units = registry.units().count(), "unit registry ready");

    let state = AppState {
        registry: Arc::new(registry),
        sink: store.clone(),
        audit: store,
        default_province: config.default_province.clone(),
    };

    let app = router(state);

    println!("API listening on http://{}", config.api_bind);
    println!("\nEndpoints:");
    println!("  GET  /health");
    println!("  GET  /units");
    println!("  POST /preview  {{ unit, text, defaultProvince }}");
    println!("  POST /import   {{ unit, rows, createdBy }}");

    let listener = tokio::net::TcpListener::bind(&config.api_bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ingest::{AuditEntry, NewRecord, WriteError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        offline: bool,
        written: Mutex<Vec<NewRecord>>,
        audit: Mutex<Vec<AuditEntry>>,
    }

    #[async_trait]
    impl RecordSink for MemoryStore {
        async fn open(&self, _unit: &str) -> Result<(), WriteError> {
            if self.offline {
                return Err(WriteError::Rejected("offline".to_string()));
            }
            Ok(())
        }

        async fn write(&self, record: &NewRecord) -> Result<(), WriteError> {
            self.written.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    #[async_trait]
    impl AuditLog for MemoryStore {
        async fn append(&self, entry: &AuditEntry) -> Result<(), WriteError> {
            self.audit.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    fn state_with(store: Arc<MemoryStore>) -> AppState {
        AppState {
            registry: Arc::new(UnitRegistry::builtin()),
            sink: store.clone(),
            audit: store,
            default_province: "Palawan".to_string(),
        }
    }

    fn preview(unit: &str, text: &str) -> PreviewRequest {
        PreviewRequest {
            unit: unit.to_string(),
            text: text.to_string(),
            default_province: None,
        }
    }

    #[tokio::test]
    async fn test_preview_generic_unit_uses_state_default_province() {
        let state = state_with(Arc::new(MemoryStore::default()));
        let text = "Applicant\tProvince\nJane Doe\t\n";
        let response = preview_handler(State(state), Json(preview("seed-growers", text))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_preview_unknown_unit_is_not_found() {
        let state = state_with(Arc::new(MemoryStore::default()));
        let response = preview_handler(State(state), Json(preview("no-such-unit", "a\tb"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_import_writes_rows() {
        let store = Arc::new(MemoryStore::default());
        let state = state_with(store.clone());
        let rows: Vec<ParsedRow> = vec![
            [("applicant", "Jane Doe")].into_iter().collect(),
            [("applicant", "Juan Cruz")].into_iter().collect(),
        ];
        let req = ImportRequest {
            unit: "seed-growers".to_string(),
            rows,
            created_by: "user-7".to_string(),
        };

        let response = import_handler(State(state), Json(req)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(store.written.lock().unwrap().len(), 2);
        assert_eq!(store.audit.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_import_empty_rows_is_bad_request() {
        let store = Arc::new(MemoryStore::default());
        let req = ImportRequest {
            unit: "animal-feeds".to_string(),
            rows: vec![],
            created_by: "user-7".to_string(),
        };
        let response = import_handler(State(state_with(store.clone())), Json(req)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.audit.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_store_offline_is_unavailable() {
        let store = Arc::new(MemoryStore {
            offline: true,
            ..Default::default()
        });
        let req = ImportRequest {
            unit: "animal-feeds".to_string(),
            rows: vec![[("registrationNo", "D-001")].into_iter().collect()],
            created_by: "user-7".to_string(),
        };
        let response = import_handler(State(state_with(store)), Json(req)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_unit_listing_marks_parser_kind() {
        let listing = unit_listing(&UnitRegistry::builtin());
        let kind = |unit: &str| listing.iter().find(|u| u.unit == unit).map(|u| u.parser);
        assert_eq!(kind("animal-feeds"), Some("custom"));
        assert_eq!(kind("seed-growers"), Some("generic"));
        assert_eq!(kind("no-such-unit"), None);
    }
}
