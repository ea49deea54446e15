//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the note handlers
//! - Wire up middleware (tracing, limits, request ID)
//! - Bind server to listener
//! - Run each request's work on a blocking thread inside an INFO scope
//!
//! # Design Decisions
//! - A handler scope and the service scope it wraps share one thread, so the
//!   diagnostic context is visible to both and never crosses an `.await`

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestId};
use crate::http::response::ApiError;
use crate::mdc_scope;
use crate::notes::{Note, NoteService};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NoteService>,
}

impl AppState {
    pub fn new(notes: NoteService) -> Self {
        Self {
            notes: Arc::new(notes),
        }
    }

    /// Run `f` against the service on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&NoteService) -> crate::error::Result<T> + Send + 'static,
    {
        let notes = self.notes.clone();
        let result = tokio::task::spawn_blocking(move || f(notes.as_ref())).await?;
        Ok(result?)
    }
}

/// HTTP server for the notes API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, notes: NoteService) -> Self {
        let router = build_router(&config, AppState::new(notes));
        Self { router }
    }

    /// Run the server until a message arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/notes", get(get_all_notes).post(create_note))
        .route(
            "/api/notes/{id}",
            get(get_note_by_id).put(update_note).delete(delete_note),
        )
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(set_request_id_layer())
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn create_note(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(note): Json<Note>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let created = state
        .blocking(move |notes| {
            let _mdc = mdc_scope!(info, "serving POST /api/notes", "request_id" => request_id.as_str());
            notes.create_note(note)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_all_notes(
    State(state): State<AppState>,
    request_id: RequestId,
) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state
        .blocking(move |notes| {
            let _mdc = mdc_scope!(info, "serving GET /api/notes", "request_id" => request_id.as_str());
            notes.get_all_notes()
        })
        .await?;
    Ok(Json(notes))
}

async fn get_note_by_id(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError> {
    let note = state
        .blocking(move |notes| {
            let _mdc = mdc_scope!(
                info,
                "serving GET /api/notes/{id}",
                "request_id" => request_id.as_str(),
                "id" => id.to_string(),
            );
            notes.get_note_by_id(id)
        })
        .await?;
    Ok(Json(note))
}

async fn update_note(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<i64>,
    Json(note): Json<Note>,
) -> Result<Json<Note>, ApiError> {
    let updated = state
        .blocking(move |notes| {
            let _mdc = mdc_scope!(
                info,
                "serving PUT /api/notes/{id}",
                "request_id" => request_id.as_str(),
                "id" => id.to_string(),
            );
            notes.update_note(id, note)
        })
        .await?;
    Ok(Json(updated))
}

async fn delete_note(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .blocking(move |notes| {
            let _mdc = mdc_scope!(
                info,
                "serving DELETE /api/notes/{id}",
                "request_id" => request_id.as_str(),
                "id" => id.to_string(),
            );
            notes.delete_note(id)
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
