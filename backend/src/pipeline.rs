//! Run an operation on a CSV file from disk.
//!
//! Same checks as an HTTP upload: the file goes through the upload policy
//! (size, `.csv` extension) before it is parsed. Used by `matrixops run`.
//!
//! # Example
//!
//! ```rust,ignore
//! use matrixops::pipeline::run_file;
//! use matrixops::{Operation, MAX_UPLOAD_BYTES};
//! use std::path::Path;
//!
//! let output = run_file(Operation::Sum, Path::new("matrix.csv"), MAX_UPLOAD_BYTES)?;
//! println!("{}", output.body);
//! ```

use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{MatrixError, UploadError};
use crate::matrix::operations::OperationOutput;
use crate::matrix::Operation;
use crate::parser::parse_matrix;
use crate::validation::{validate_upload, UploadMeta};

/// Errors from [`run_file`]
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("{0}")]
    Matrix(#[from] MatrixError),
}

/// Validate, parse and apply `operation` to the file at `path`.
pub fn run_file(
    operation: Operation,
    path: &Path,
    max_upload_bytes: u64,
) -> Result<OperationOutput, RunError> {
    let io_error = |source| RunError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_error)?.len();
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    validate_upload(Some(UploadMeta::new(file_name, size)), max_upload_bytes)?;

    let bytes = std::fs::read(path).map_err(io_error)?;
    let matrix = parse_matrix(&bytes)?;
    debug!("{}: {}x{} matrix", path.display(), matrix.size(), matrix.size());

    let output = operation.apply(&matrix);
    if output.overflow_suspected {
        warn!("{}: product is zero, possible integer overflow", path.display());
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MAX_UPLOAD_BYTES;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_run_file() {
        let file = csv_file("1,2\n3,4");

        let output = run_file(Operation::Sum, file.path(), MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(output.body, "10");
        assert!(!output.overflow_suspected);

        let output = run_file(Operation::Invert, file.path(), MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(output.body, "1,3\n2,4");
    }

    #[test]
    fn test_zero_product_is_flagged() {
        let file = csv_file("0,2\n3,4");
        let output = run_file(Operation::Multiply, file.path(), MAX_UPLOAD_BYTES).unwrap();
        assert_eq!(output.body, "0");
        assert!(output.overflow_suspected);
    }

    #[test]
    fn test_upload_policy_applies() {
        let mut txt = Builder::new().suffix(".txt").tempfile().unwrap();
        write!(txt, "1,2\n3,4").unwrap();
        assert!(matches!(
            run_file(Operation::Echo, txt.path(), MAX_UPLOAD_BYTES),
            Err(RunError::Upload(UploadError::InvalidExtension { .. }))
        ));

        let file = csv_file("1,2\n3,4");
        assert!(matches!(
            run_file(Operation::Echo, file.path(), 4),
            Err(RunError::Upload(UploadError::TooLarge { size: Some(7), limit: 4 }))
        ));
    }

    #[test]
    fn test_bad_matrix() {
        let file = csv_file("1,2\n3,4,5");
        assert!(matches!(
            run_file(Operation::Echo, file.path(), MAX_UPLOAD_BYTES),
            Err(RunError::Matrix(MatrixError::InconsistentRow { row: 1 }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = run_file(Operation::Echo, Path::new("/nonexistent/m.csv"), MAX_UPLOAD_BYTES)
            .unwrap_err();
        assert!(matches!(err, RunError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/m.csv"));
    }
}
