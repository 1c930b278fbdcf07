//! Axum route handlers for the extraction API.

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::extraction::pipeline::{run_extraction, ExtractionOutcome};
use crate::state::AppState;
use crate::storage::ArtifactName;

const FILE_NOT_FOUND: &str = "File not found";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub count: usize,
    pub download_url: String,
}

/// POST /extract
///
/// Takes the first multipart part as the PDF, whatever its field name.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;

    match run_extraction(state.store.as_ref(), upload).await? {
        ExtractionOutcome::NoRequirements => Err(AppError::NoRequirements),
        ExtractionOutcome::Extracted { count, spreadsheet } => Ok(Json(ExtractResponse {
            count,
            download_url: state.config.download_url(&spreadsheet.to_string()),
        })),
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?;

    let Some(field) = field else {
        return Err(AppError::Validation("No file uploaded.".to_string()));
    };

    debug!(
        "Received field: name={:?}, filename={:?}, content_type={:?}",
        field.name(),
        field.file_name(),
        field.content_type()
    );

    field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))
}

/// GET /download/:filename
///
/// Only names the service generated itself are looked up; anything else is a 404
/// before the filesystem is touched. The file is streamed, not buffered.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let Some(name) = ArtifactName::parse(&filename) else {
        warn!("Rejected download of non-artifact name {filename:?}");
        return Err(AppError::NotFound(FILE_NOT_FOUND.to_string()));
    };

    let artifact = state
        .store
        .fetch(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(FILE_NOT_FOUND.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, name.kind().content_type())
        .header(header::CONTENT_LENGTH, artifact.len)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        )
        .body(Body::from_stream(ReaderStream::new(artifact.reader)))
        .map_err(|e| AppError::Internal(e.into()))
}
