use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use report_flow::{
    ConfigError, Event, GeminiConfig, GenerationClient, InMemoryLifecycleStorage, LifecycleError,
    LifecycleRunner,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    models::{AttachDocumentRequest, NotesRequest, SectionsResponse, SessionResponse},
    prompt_templates::{SAMPLE_DOCUMENT_TEXT, SYSTEM_INSTRUCTION},
    render::render_sections,
};

type ApiResult<T> = Result<(StatusCode, Json<T>), ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn conflict_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::CONFLICT,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn lifecycle_error(session_id: &str, e: LifecycleError) -> ApiError {
    match e {
        LifecycleError::SessionNotFound(_) => not_found_error("Session not found", session_id),
        LifecycleError::InvalidTransition { .. } => {
            warn!("Rejected request for session {}: {}", session_id, e);
            conflict_error("Action not allowed in the current state", &e.to_string())
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub runner: LifecycleRunner,
}

impl AppState {
    pub fn new(runner: LifecycleRunner) -> Self {
        Self { runner }
    }
}

/// Builds the service against the live Gemini endpoint.
pub fn create_app(config: GeminiConfig) -> Result<Router, ConfigError> {
    let client = GenerationClient::gemini(config, SYSTEM_INSTRUCTION)?;
    Ok(build_router(create_app_state(client)))
}

pub fn create_app_state(client: GenerationClient) -> AppState {
    let storage = Arc::new(InMemoryLifecycleStorage::new());
    AppState::new(LifecycleRunner::new(client, storage, SAMPLE_DOCUMENT_TEXT))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/reports", post(create_session))
        .route("/reports/{session_id}", get(get_session).delete(delete_session))
        .route("/reports/{session_id}/document", post(attach_document))
        .route("/reports/{session_id}/notes", put(edit_notes))
        .route("/reports/{session_id}/generate", post(generate_report))
        .route("/reports/{session_id}/reset", post(reset_session))
        .route("/reports/{session_id}/sections", get(get_sections))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Medical Report Generation Service",
        "version": "1.0.0",
        "description": "Generates structured medical consultation reports from document text and doctor notes",
        "endpoints": {
            "POST /reports": "Start a new report session",
            "GET /reports/{session_id}": "Get session state",
            "DELETE /reports/{session_id}": "Discard a session",
            "POST /reports/{session_id}/document": "Attach a document by file name",
            "PUT /reports/{session_id}/notes": "Set the doctor's notes",
            "POST /reports/{session_id}/generate": "Generate the report",
            "POST /reports/{session_id}/reset": "Clear the session",
            "GET /reports/{session_id}/sections": "Rendered report sections",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "generating": state.runner.client().is_busy(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn create_session(State(state): State<AppState>) -> ApiResult<SessionResponse> {
    let session = state.runner.storage().create().await.map_err(|e| {
        error!("Failed to create session: {}", e);
        internal_error("Failed to create report session", &e.to_string())
    })?;
    info!("Created report session {}", session.id);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new(&session.id, session.state)),
    ))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    match state.runner.storage().get(&session_id).await {
        Ok(Some(session)) => Ok((
            StatusCode::OK,
            Json(SessionResponse::new(&session_id, session.state)),
        )),
        Ok(None) => Err(not_found_error("Session not found", &session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            Err(internal_error("Failed to load session", &e.to_string()))
        }
    }
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Value> {
    state
        .runner
        .storage()
        .delete(&session_id)
        .await
        .map_err(|e| lifecycle_error(&session_id, e))?;
    info!("Deleted report session {}", session_id);

    Ok((
        StatusCode::OK,
        Json(json!({
            "session_id": session_id,
            "deleted": true
        })),
    ))
}

async fn attach_document(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<AttachDocumentRequest>,
) -> ApiResult<SessionResponse> {
    if request.file_name.trim().is_empty() {
        return Err(bad_request_error("File name is required"));
    }
    apply_event(&state, &session_id, Event::AttachDocument(request.file_name)).await
}

async fn edit_notes(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<NotesRequest>,
) -> ApiResult<SessionResponse> {
    apply_event(&state, &session_id, Event::EditNotes(request.notes)).await
}

async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    apply_event(&state, &session_id, Event::Reset).await
}

async fn apply_event(state: &AppState, session_id: &str, event: Event) -> ApiResult<SessionResponse> {
    let step = state
        .runner
        .begin(session_id, event)
        .await
        .map_err(|e| lifecycle_error(session_id, e))?;
    Ok((
        StatusCode::OK,
        Json(SessionResponse::new(session_id, step.state)),
    ))
}

/// Accepts the submission and runs generation in the background so the
/// loading state can be polled. Answers 200 with the error when no document
/// is attached.
async fn generate_report(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SessionResponse> {
    let step = state
        .runner
        .begin(&session_id, Event::Submit)
        .await
        .map_err(|e| lifecycle_error(&session_id, e))?;

    if step.effects.is_empty() {
        return Ok((
            StatusCode::OK,
            Json(SessionResponse::new(&session_id, step.state)),
        ));
    }

    let runner = state.runner.clone();
    let background_id = session_id.clone();
    let effects = step.effects;
    tokio::spawn(async move {
        match runner.complete(&background_id, effects).await {
            Ok(final_state) => info!(
                "Generation finished for session {}: {}",
                background_id,
                final_state.phase.name()
            ),
            Err(e) => error!(
                "Failed to record generation outcome for session {}: {}",
                background_id, e
            ),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SessionResponse::new(&session_id, step.state)),
    ))
}

async fn get_sections(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<SectionsResponse> {
    let session = match state.runner.storage().get(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return Err(not_found_error("Session not found", &session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            return Err(internal_error("Failed to load session", &e.to_string()));
        }
    };

    let report = session.state.report().ok_or_else(|| {
        conflict_error(
            "Report not available",
            &format!("session is in the {} phase", session.state.phase.name()),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(SectionsResponse {
            session_id,
            sections: render_sections(report),
        }),
    ))
}
