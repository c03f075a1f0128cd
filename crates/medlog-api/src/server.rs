//! HTTP backend serving the medication log.
//!
//! Routes:
//! - `GET /` - liveness text
//! - `POST /log` - store one entry
//! - `GET /medications` - all entries, most recent first

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use medlog_core::{NewEntry, ValidationError};
use medlog_db::{Database, DbError};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::wire::{
    ErrorResponse, LOGGED_MESSAGE, LogRequest, MessageResponse, REQUIRED_FIELDS_ERROR, WELCOME,
    encode_row,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Runs `f` with exclusive access to the store.
    fn with_db<T>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<T, DbError>,
    ) -> Result<T, ApiFailure> {
        let mut db = self.db.lock().map_err(|_| ApiFailure::internal("store lock poisoned"))?;
        f(&mut *db).map_err(|err| {
            tracing::error!(%err, "store operation failed");
            ApiFailure::internal(err.to_string())
        })
    }
}

/// A failed request, rendered as `{"error": "..."}`.
#[derive(Debug)]
struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiFailure {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Empty { .. } => Self::bad_request(REQUIRED_FIELDS_ERROR),
            ValidationError::InvalidSource { .. } => Self::bad_request(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Builds the router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/log", post(log_medication))
        .route("/medications", get(list_medications))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    WELCOME
}

async fn log_medication(
    State(state): State<AppState>,
    payload: Result<Json<LogRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiFailure> {
    let Json(request) = payload?;
    let entry = NewEntry::try_from(request)?;
    let id = state.with_db(|db| db.insert_entry(&entry))?;
    tracing::info!(id, medication = %entry.medication, source = %entry.source, "logged medication");

    let body = MessageResponse {
        message: LOGGED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

async fn list_medications(State(state): State<AppState>) -> Result<impl IntoResponse, ApiFailure> {
    let entries = state.with_db(|db| db.list_entries())?;
    let rows: Vec<_> = entries.iter().map(encode_row).collect();
    Ok(Json(rows))
}

/// Serves the backend on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, db: Database) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "medication log API listening");
    }
    axum::serve(listener, router(AppState::new(db)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
