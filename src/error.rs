use axum::http::StatusCode;
use thiserror::Error;

pub type RaceResult<T> = Result<T, RaceError>;

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Please upload an Excel file (.xlsx)")]
    WrongExtension,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Invalid table data: {0}")]
    InvalidPayload(String),

    #[error("Row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Error processing file: {0}")]
    Import(String),

    #[error("Error generating file: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RaceError {
    /// HTTP status reported for this error. Caller mistakes are 4xx,
    /// everything that failed on our side is 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RaceError::NoFileUploaded
            | RaceError::NoFileSelected
            | RaceError::WrongExtension
            | RaceError::InvalidUpload(_)
            | RaceError::InvalidPayload(_)
            | RaceError::RowWidth { .. } => StatusCode::BAD_REQUEST,
            RaceError::Import(_)
            | RaceError::Export(_)
            | RaceError::Io(_)
            | RaceError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
