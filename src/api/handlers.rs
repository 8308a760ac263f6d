//! API request handlers
//!
//! Handlers for all REST API endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocSearchResult;
use crate::frame::ResultRow;
use crate::search::{DocumentSearch, SearchField, SearchOutcome};
use crate::session::Session;
use crate::translate::{TranslationPipeline, TranslationRun};
use crate::upload::UploadedFile;

use super::server::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Standard API response wrapper
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

fn error_response<T: Serialize + Default>(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<T>::err(message))).into_response()
}

fn session_not_found<T: Serialize + Default>(id: Uuid) -> Response {
    error_response::<T>(StatusCode::NOT_FOUND, format!("Session not found: {}", id))
}

/// Root endpoint response
#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub modes: Vec<String>,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize, Deserialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

fn endpoint(method: &str, path: &str, description: &str) -> EndpointInfo {
    EndpointInfo {
        path: path.to_string(),
        method: method.to_string(),
        description: description.to_string(),
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "STR Document Search API".to_string(),
        version: state.version.clone(),
        description: "Translate Marathi property registration spreadsheets and search them"
            .to_string(),
        modes: vec![
            "Translate Marathi Excel Files".to_string(),
            "Search Document Details".to_string(),
        ],
        endpoints: vec![
            endpoint("GET", "/health", "Health check endpoint"),
            endpoint("GET", "/version", "Get server version"),
            endpoint("POST", "/api/v1/sessions", "Open a session"),
            endpoint("DELETE", "/api/v1/sessions/:id", "Close a session"),
            endpoint(
                "POST",
                "/api/v1/sessions/:id/translate",
                "Translate uploaded Marathi Excel files (multipart)",
            ),
            endpoint(
                "GET",
                "/api/v1/sessions/:id/exports/:name",
                "Download the translated copy of an uploaded file",
            ),
            endpoint(
                "POST",
                "/api/v1/sessions/:id/search",
                "Search property descriptions in the session's translated files",
            ),
            endpoint(
                "POST",
                "/api/v1/search",
                "Search document details in uploaded English files (multipart)",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        sessions: state.sessions.len().await,
    }))
}

/// Version response
#[derive(Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "translate".to_string(),
            "export".to_string(),
            "property-search".to_string(),
            "document-search".to_string(),
        ],
    }))
}

/// Session response
#[derive(Serialize, Deserialize, Default)]
pub struct SessionResponse {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub translated_files: usize,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            created_at: session.created_at(),
            translated_files: session.translated_frames().len(),
        }
    }
}

/// POST /api/v1/sessions - Open a session
pub async fn create_session(State(state): State<Arc<AppState>>) -> Response {
    let id = state.sessions.create().await;
    match state.sessions.with_session(id, |s| SessionResponse::from(s)).await {
        Some(session) => {
            tracing::info!(session = %id, "Session opened");
            (StatusCode::CREATED, Json(ApiResponse::ok(session))).into_response()
        }
        None => session_not_found::<SessionResponse>(id),
    }
}

/// DELETE /api/v1/sessions/:id - Close a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.sessions.remove(id).await {
        Some(session) => {
            tracing::info!(session = %id, "Session closed");
            Json(ApiResponse::ok(SessionResponse::from(&session))).into_response()
        }
        None => session_not_found::<SessionResponse>(id),
    }
}

/// Files and text fields of a multipart upload
struct UploadForm {
    files: Vec<UploadedFile>,
    fields: HashMap<String, String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, String> {
    let mut files = Vec::new();
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid multipart field: {}", e))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match field.file_name().map(|s| s.to_string()) {
            Some(file_name) => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Invalid upload {}: {}", file_name, e))?;
                files.push(UploadedFile::from_bytes(file_name, bytes.to_vec()));
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Invalid multipart field text: {}", e))?;
                fields.insert(name, text);
            }
        }
    }

    Ok(UploadForm { files, fields })
}

/// One translated file in a translate response
#[derive(Serialize, Deserialize, Default)]
pub struct TranslatedFileInfo {
    pub original_name: String,
    pub rows: usize,
    pub cells_translated: usize,
    pub cells_fallback: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Translate response
#[derive(Serialize, Deserialize, Default)]
pub struct TranslateResponse {
    pub files: Vec<TranslatedFileInfo>,
    pub warnings: Vec<String>,
}

/// POST /api/v1/sessions/:id/translate - Translate uploaded files
///
/// Replaces the session's previous translations.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Response {
    if !state.sessions.contains(id).await {
        return session_not_found::<TranslateResponse>(id);
    }

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => {
            return error_response::<TranslateResponse>(StatusCode::BAD_REQUEST, message)
        }
    };
    if form.files.is_empty() {
        return error_response::<TranslateResponse>(
            StatusCode::BAD_REQUEST,
            "Upload at least one .xls or .xlsx file",
        );
    }

    let config = state.config.translation.clone();
    let output_dir = state.config.export.output_dir.join(id.to_string());
    let factory = Arc::clone(&state.translators);

    // The translator's blocking HTTP client must live off the async runtime
    let result = tokio::task::spawn_blocking(move || -> DocSearchResult<TranslationRun> {
        let translator = factory(&config)?;
        let pipeline = TranslationPipeline::new(translator.as_ref(), &config, &output_dir);
        Ok(pipeline.run(&form.files))
    })
    .await;

    let run = match result {
        Ok(Ok(run)) => run,
        Ok(Err(e)) => {
            return error_response::<TranslateResponse>(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            tracing::error!(session = %id, error = %e, "Translation task failed");
            return error_response::<TranslateResponse>(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Translation task failed",
            );
        }
    };

    let report = state
        .sessions
        .with_session_mut(id, |session| session.replace_translations(run))
        .await;
    let Some(report) = report else {
        return session_not_found::<TranslateResponse>(id);
    };

    let files = report
        .files
        .iter()
        .map(|f| TranslatedFileInfo {
            original_name: f.original_name.clone(),
            rows: f.rows,
            cells_translated: f.cells_translated,
            cells_fallback: f.cells_fallback,
            download_url: f
                .export_path
                .as_ref()
                .map(|_| export_url(id, &f.original_name)),
        })
        .collect();

    Json(ApiResponse::ok(TranslateResponse {
        files,
        warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
    }))
    .into_response()
}

/// Download path of the export of `original_name`; the name is one encoded
/// path segment
pub fn export_url(id: Uuid, original_name: &str) -> String {
    format!(
        "/api/v1/sessions/{}/exports/{}",
        id,
        urlencoding::encode(original_name)
    )
}

/// GET /api/v1/sessions/:id/exports/:name - Download a translated workbook
pub async fn download_export(
    State(state): State<Arc<AppState>>,
    Path((id, name)): Path<(Uuid, String)>,
) -> Response {
    let artifact = state
        .sessions
        .with_session(id, |s| s.export_for(&name).cloned())
        .await;

    let artifact = match artifact {
        None => return session_not_found::<()>(id),
        Some(None) => {
            return error_response::<()>(
                StatusCode::NOT_FOUND,
                format!("No translated copy of {}", name),
            )
        }
        Some(Some(artifact)) => artifact,
    };

    match tokio::fs::read(&artifact.path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name()),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => error_response::<()>(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read {}: {}", artifact.path.display(), e),
        ),
    }
}

/// Search response
#[derive(Serialize, Deserialize, Default)]
pub struct SearchResponse {
    pub summary: String,
    pub has_results: bool,
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
    pub warnings: Vec<String>,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            summary: outcome.summary(),
            has_results: outcome.has_results(),
            warnings: outcome.warnings.iter().map(|w| w.to_string()).collect(),
            columns: outcome.table.columns,
            rows: outcome.table.rows,
        }
    }
}

/// Property search request
#[derive(Deserialize)]
pub struct PropertySearchRequest {
    pub query: String,
}

/// POST /api/v1/sessions/:id/search - Search translated property descriptions
pub async fn property_search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<PropertySearchRequest>,
) -> Response {
    let outcome = state
        .sessions
        .with_session(id, |s| s.search_property_description(&req.query))
        .await;

    match outcome {
        Some(outcome) => Json(ApiResponse::ok(SearchResponse::from(outcome))).into_response(),
        None => session_not_found::<SearchResponse>(id),
    }
}

/// POST /api/v1/search - Search document details in uploaded files
///
/// Multipart fields: one or more files, `column` (default
/// `PropertyDescription`) and `value`.
pub async fn document_search(multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(message) => return error_response::<SearchResponse>(StatusCode::BAD_REQUEST, message),
    };

    let column = match form.fields.get("column") {
        Some(raw) => match raw.parse::<SearchField>() {
            Ok(column) => column,
            Err(message) => {
                return error_response::<SearchResponse>(StatusCode::BAD_REQUEST, message)
            }
        },
        None => SearchField::default(),
    };
    let value = form.fields.get("value").cloned().unwrap_or_default();
    let files = form.files;

    let result =
        tokio::task::spawn_blocking(move || DocumentSearch::new(column, value).run(&files)).await;

    match result {
        Ok(outcome) => Json(ApiResponse::ok(SearchResponse::from(outcome))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Search task failed");
            error_response::<SearchResponse>(StatusCode::INTERNAL_SERVER_ERROR, "Search task failed")
        }
    }
}
