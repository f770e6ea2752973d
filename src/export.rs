//! Per-request export files
//!
//! Each download writes its table to a uniquely named temporary .xlsx,
//! streams it back and removes it once the response body is finished.
//! Removal failures are logged and never reach the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use axum::body::{Body, Bytes};
use chrono::{DateTime, TimeZone};
use tokio::io::AsyncReadExt;
use tracing::{debug, error};

use crate::error::{RaceError, RaceResult};
use crate::excel::ExcelExporter;
use crate::types::Table;

/// MIME type of .xlsx workbooks
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const TEMP_PREFIX: &str = "race_results_";
const CHUNK_SIZE: usize = 64 * 1024;

/// Client-side save name: `race_results_YYYYMMDD_HHMMSS.xlsx`
pub fn download_filename<Tz>(now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("race_results_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

/// A temporary workbook owned by a single export request.
///
/// The file is removed when the artifact is dropped.
#[derive(Debug)]
pub struct ExportArtifact {
    path: PathBuf,
    removed: bool,
}

impl ExportArtifact {
    /// Allocate a fresh temp file and write `table` into it
    pub fn create(table: &Table) -> RaceResult<Self> {
        Self::create_in(&std::env::temp_dir(), table)
    }

    /// Same as [`ExportArtifact::create`] with an explicit directory
    pub fn create_in(dir: &Path, table: &Table) -> RaceResult<Self> {
        let (file, path) = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".xlsx")
            .tempfile_in(dir)
            .map_err(|e| RaceError::Export(e.to_string()))?
            .keep()
            .map_err(|e| RaceError::Export(e.to_string()))?;
        drop(file);

        // From here on the guard owns the path, so a failed write still cleans up
        let artifact = Self {
            path,
            removed: false,
        };
        ExcelExporter::new().write(table, &artifact.path)?;
        debug!(path = %artifact.path.display(), rows = table.row_count(), "Export file written");

        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now and report the outcome
    pub fn close(mut self) -> io::Result<()> {
        self.removed = true;
        fs::remove_file(&self.path)
    }

    /// Stream the file as a response body. The artifact travels with the
    /// stream and is dropped (removing the file) when the body ends or the
    /// client goes away.
    pub async fn into_body(self) -> RaceResult<Body> {
        let file = tokio::fs::File::open(&self.path)
            .await
            .map_err(|e| RaceError::Export(e.to_string()))?;

        let stream = futures::stream::unfold(Some((file, self)), |state| async move {
            let (mut file, artifact) = state?;
            let mut buf = vec![0u8; CHUNK_SIZE];
            match file.read(&mut buf).await {
                Ok(0) => {
                    drop(file);
                    drop(artifact);
                    None
                }
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok::<_, io::Error>(Bytes::from(buf)), Some((file, artifact))))
                }
                Err(e) => Some((Err(e), None)),
            }
        });

        Ok(Body::from_stream(stream))
    }
}

impl Drop for ExportArtifact {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Export file removed"),
            Err(e) => error!(
                path = %self.path.display(),
                "Error removing downloaded file: {}", e
            ),
        }
    }
}
