//! Upload → `.pdf` → `.docx` → records → `.xlsx`, one request at a time.
//!
//! The library-bound steps are CPU work and run on the blocking pool; a panic
//! inside one of them comes back as `PipelineError::Worker`.

use bytes::Bytes;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;

use crate::extraction::converter::{convert_pdf, ConvertError};
use crate::extraction::docx::DocxError;
use crate::extraction::requirements::extract_from_docx;
use crate::extraction::spreadsheet::{render_workbook, SpreadsheetError};
use crate::storage::{ArtifactKind, ArtifactName, ArtifactStore, StorageError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("reading converted document failed: {0}")]
    Docx(#[from] DocxError),

    #[error("spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("pipeline worker failed: {0}")]
    Worker(#[from] JoinError),
}

#[derive(Debug)]
pub enum ExtractionOutcome {
    Extracted {
        count: usize,
        spreadsheet: ArtifactName,
    },
    /// No paragraph qualified; no spreadsheet was written.
    NoRequirements,
}

async fn run_blocking<T, E, F>(f: F) -> Result<T, PipelineError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<PipelineError> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await?.map_err(Into::into)
}

pub async fn run_extraction(
    store: &dyn ArtifactStore,
    upload: Bytes,
) -> Result<ExtractionOutcome, PipelineError> {
    let pdf_name = ArtifactName::generate(ArtifactKind::Pdf);
    store.put(&pdf_name, &upload).await?;
    info!("Stored upload as {pdf_name} ({} bytes)", upload.len());

    let converted = run_blocking(move || convert_pdf(&upload)).await?;
    let docx_name = pdf_name.sibling(ArtifactKind::Docx);
    store.put(&docx_name, &converted.docx).await?;
    info!(
        "Converted {pdf_name} to {docx_name} ({} paragraphs)",
        converted.paragraph_count
    );

    let docx = converted.docx;
    let records = run_blocking(move || extract_from_docx(&docx)).await?;
    if records.is_empty() {
        info!("No requirements found in {docx_name}");
        return Ok(ExtractionOutcome::NoRequirements);
    }
    let count = records.len();
    info!("Extracted {count} requirement(s) from {docx_name}");

    let workbook = run_blocking(move || render_workbook(&records)).await?;
    let xlsx_name = pdf_name.sibling(ArtifactKind::Xlsx);
    store.put(&xlsx_name, &workbook).await?;
    info!("Wrote {xlsx_name}");

    Ok(ExtractionOutcome::Extracted {
        count,
        spreadsheet: xlsx_name,
    })
}
