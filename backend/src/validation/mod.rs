//! Upload policy checks.
//!
//! Runs on file metadata only, before any byte is parsed:
//!
//! 1. a file part was sent
//! 2. its size is within the limit (5 MiB by default)
//! 3. its name ends in `.csv`, case-insensitively
//!
//! The first violated rule is returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use matrixops::validation::{validate_upload, UploadMeta, MAX_UPLOAD_BYTES};
//!
//! let meta = UploadMeta::new("matrix.CSV", 12);
//! let meta = validate_upload(Some(meta), MAX_UPLOAD_BYTES).unwrap();
//! assert_eq!(meta.size, 12);
//! ```

use crate::error::{UploadError, UploadResult};

/// Default upload limit: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Metadata of an uploaded file, kept only until validation passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMeta {
    pub file_name: String,
    pub size: u64,
}

impl UploadMeta {
    pub fn new(file_name: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            size,
        }
    }
}

/// Check upload metadata against the upload policy and hand it back once
/// every rule passes.
pub fn validate_upload(meta: Option<UploadMeta>, max_bytes: u64) -> UploadResult<UploadMeta> {
    let meta = meta.ok_or(UploadError::MissingFile)?;

    if meta.size > max_bytes {
        return Err(UploadError::TooLarge {
            size: Some(meta.size),
            limit: max_bytes,
        });
    }

    if !meta.file_name.to_lowercase().ends_with(".csv") {
        return Err(UploadError::InvalidExtension {
            file_name: meta.file_name,
        });
    }

    Ok(meta)
}
