//! API request handlers
//!
//! Handlers for the scoring page, upload and download endpoints.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::RaceError;
use crate::excel::{check_file_name, ExcelImporter};
use crate::export::{download_filename, ExportArtifact, XLSX_MIME};
use crate::types::{Row, Table};

use super::server::AppState;

/// Multipart field carrying the workbook
pub const UPLOAD_FIELD: &str = "file";

const INDEX_HTML: &str = include_str!("index.html");

/// Error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error, rendered as a JSON error body with the matching status
#[derive(Debug)]
pub struct ApiError(pub RaceError);

impl From<RaceError> for ApiError {
    fn from(err: RaceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if self.0.is_client_error() {
            warn!(status = status.as_u16(), "{}", self.0);
        } else {
            error!(status = status.as_u16(), "{}", self.0);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// GET / - Scoring page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Version response
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub schema: String,
    pub columns: Vec<String>,
}

/// GET /version - Server version and active column schema
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(VersionResponse {
        version: state.version.clone(),
        schema: state.schema.to_string(),
        columns: state.schema.columns().iter().map(|c| c.to_string()).collect(),
    })
}

/// Upload response: data rows of the first worksheet
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub data: Vec<Row>,
}

/// POST /upload - Parse an uploaded workbook into rows
pub async fn upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // A request that is not multipart at all carries no file either
    let mut multipart = multipart.map_err(|_| RaceError::NoFileUploaded)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RaceError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // Plain form values named `file` are not uploads
        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => return Err(RaceError::NoFileUploaded.into()),
        };
        check_file_name(&file_name)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| RaceError::InvalidUpload(e.to_string()))?;

        let size = bytes.len();
        let sheet = tokio::task::spawn_blocking(move || ExcelImporter::from_bytes(&bytes))
            .await
            .map_err(|e| RaceError::Import(e.to_string()))??;

        info!(
            file = %file_name,
            bytes = size,
            sheet = %sheet.sheet_name,
            rows = sheet.row_count(),
            "Imported workbook"
        );

        return Ok(Json(UploadResponse { data: sheet.rows }));
    }

    Err(RaceError::NoFileUploaded.into())
}

/// POST /download - Turn edited rows into a timestamped workbook
pub async fn download(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<Row>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(rows) = payload.map_err(|e| RaceError::InvalidPayload(e.body_text()))?;
    let table = Table::from_schema(state.schema, rows)?;
    send_table(table).await
}

/// GET /download - Fixed sample row, ignores any input
pub async fn download_sample(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let table = Table::from_schema(state.schema, state.schema.sample_rows())?;
    send_table(table).await
}

async fn send_table(table: Table) -> Result<Response, ApiError> {
    let rows = table.row_count();
    let artifact = tokio::task::spawn_blocking(move || ExportArtifact::create(&table))
        .await
        .map_err(|e| RaceError::Export(e.to_string()))??;

    let filename = download_filename(Local::now());
    info!(file = %filename, rows, "Sending workbook");

    let body = artifact.into_body().await?;
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
