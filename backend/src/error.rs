//! Error types for the matrix service.
//!
//! - [`UploadError`] - Upload policy violations (size, extension, missing file)
//! - [`MatrixError`] - CSV reading and matrix shape/content errors
//! - [`OperationError`] - Unknown operation names
//! - [`ApiError`] - Tagged dispatcher error, one HTTP status per variant
//! - [`ServerError`] - Startup and configuration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

// =============================================================================
// Upload Errors
// =============================================================================

/// Upload metadata rejected by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No file part named `file` was sent.
    #[error("No file was uploaded")]
    MissingFile,

    /// File is larger than the configured limit. `size` is `None` when the
    /// request body hit its ceiling before the part could be measured.
    #[error("File size exceeds maximum limit of {}", format_limit(.limit))]
    TooLarge { size: Option<u64>, limit: u64 },

    /// File name does not end in `.csv`.
    #[error("Invalid file format. Only CSV files are accepted")]
    InvalidExtension { file_name: String },
}

fn format_limit(limit: &u64) -> String {
    let limit = *limit;
    const MIB: u64 = 1024 * 1024;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{} bytes", limit)
    }
}

// =============================================================================
// Matrix Errors
// =============================================================================

/// Errors while turning CSV text into a square matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// The CSV reader itself failed (bad UTF-8, unreadable record).
    #[error("{0}")]
    Csv(String),

    /// No rows at all.
    #[error("empty matrix provided")]
    Empty,

    /// Row count differs from the first row's column count.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// A row has a different field count than the first row.
    #[error("inconsistent row length at row {row}")]
    InconsistentRow { row: usize },

    /// A cell is not a base-10 signed integer.
    #[error("invalid integer at position [{row},{col}]: {value}")]
    InvalidInteger {
        row: usize,
        col: usize,
        value: String,
    },
}

impl From<csv::Error> for MatrixError {
    fn from(err: csv::Error) -> Self {
        MatrixError::Csv(err.to_string())
    }
}

impl MatrixError {
    /// Whether the failure happened in the CSV reader rather than in
    /// matrix shape or content validation.
    pub fn is_csv_syntax(&self) -> bool {
        matches!(self, MatrixError::Csv(_))
    }
}

// =============================================================================
// Operation Errors
// =============================================================================

/// Errors resolving an operation name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("Invalid operation")]
    Unknown(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Everything the request dispatcher can fail with.
///
/// Each variant maps to exactly one status code, see [`ApiError::status`].
/// Bodies are plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Only POST method is allowed")]
    MethodNotAllowed,

    #[error("Content-Type must be multipart/form-data")]
    UnsupportedContentType,

    /// Multipart body could not be read.
    #[error("Error reading file: {0}")]
    Multipart(String),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("Error parsing CSV: {0}")]
    CsvSyntax(String),

    #[error("{0}")]
    InvalidOperation(#[from] OperationError),

    /// Matrix rejected and reported back to the caller.
    #[error("{0}")]
    InvalidMatrix(MatrixError),

    /// Matrix rejected and reported as a server-side failure. The detail
    /// stays in the logs.
    #[error("Internal server error processing matrix")]
    MatrixProcessing(MatrixError),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UnsupportedContentType
            | ApiError::Multipart(_)
            | ApiError::Upload(_)
            | ApiError::CsvSyntax(_)
            | ApiError::InvalidOperation(_)
            | ApiError::InvalidMatrix(_) => StatusCode::BAD_REQUEST,
            ApiError::MatrixProcessing(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain")],
            self.to_string(),
        )
            .into_response()
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// Startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for upload validation.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for matrix parsing.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for server startup.
pub type ServerResult<T> = Result<T, ServerError>;
