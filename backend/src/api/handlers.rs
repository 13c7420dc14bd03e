//! Request dispatcher shared by every operation route.
//!
//! Steps, first failure wins:
//!
//! | Step | Check                                   | Failure |
//! |------|-----------------------------------------|---------|
//! | 1    | method is `POST`                        | 405     |
//! | 2    | `Content-Type` is `multipart/form-data` | 400     |
//! | 3    | multipart body readable                 | 400     |
//! | 4    | upload policy (file, size, extension)   | 400     |
//! | 5    | CSV parses into a square matrix         | 400/500 |
//! | 6    | operation name resolves                 | 400     |

use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::{header, HeaderMap, Method, StatusCode},
};
use tracing::{debug, info, warn};

use super::types::{AppState, MatrixResponse};
use crate::config::MatrixErrorPolicy;
use crate::error::{ApiError, ApiResult, MatrixError, UploadError};
use crate::matrix::Operation;
use crate::parser::parse_matrix;
use crate::validation::{validate_upload, UploadMeta};

/// Name of the multipart field carrying the CSV file.
pub const FILE_FIELD: &str = "file";

/// Validate, parse and run `operation` on the uploaded matrix.
pub async fn handle_matrix(
    state: AppState,
    operation: &str,
    request: Request,
) -> ApiResult<MatrixResponse> {
    if request.method() != Method::POST {
        warn!("{} /{} rejected: method not allowed", request.method(), operation);
        return Err(ApiError::MethodNotAllowed);
    }

    if !is_multipart(request.headers()) {
        warn!("/{} rejected: content type is not multipart/form-data", operation);
        return Err(ApiError::UnsupportedContentType);
    }

    let max_bytes = state.config.max_upload_bytes;
    let multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| ApiError::Multipart(e.body_text()))?;

    let (meta, bytes) = read_file_field(multipart, max_bytes)
        .await
        .inspect_err(|e| warn!("/{} rejected upload: {}", operation, e))?
        .unzip();
    let meta = validate_upload(meta, max_bytes)
        .inspect_err(|e| warn!("/{} rejected upload: {}", operation, e))?;
    let bytes = bytes.unwrap_or_default();

    info!("/{} received '{}' ({} bytes)", operation, meta.file_name, meta.size);

    let matrix = parse_matrix(&bytes).map_err(|e| matrix_error(e, state.config.matrix_errors))?;
    debug!("/{} parsed {}x{} matrix", operation, matrix.size(), matrix.size());

    let operation: Operation = operation.parse()?;
    let output = operation.apply(&matrix);
    if output.overflow_suspected {
        warn!("/{} product is zero, possible integer overflow", operation);
    }

    Ok(MatrixResponse::from(output))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

/// First part named `file`, with its metadata. Other parts are drained and
/// ignored.
///
/// Reading stops as soon as the part grows past `max_bytes`; the returned
/// size is then a lower bound and the bytes are dropped, leaving the upload
/// validator to reject it.
async fn read_file_field(
    mut multipart: Multipart,
    max_bytes: u64,
) -> ApiResult<Option<(UploadMeta, Vec<u8>)>> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mut bytes = Vec::new();
        let mut size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?
        {
            size += chunk.len() as u64;
            if size > max_bytes {
                return Ok(Some((UploadMeta::new(file_name, size), Vec::new())));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Some((UploadMeta::new(file_name, size), bytes)));
    }

    Ok(None)
}

/// A body cut off by the request size ceiling is an oversized upload; any
/// other multipart failure is an unreadable body.
fn multipart_error(err: MultipartError, max_bytes: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadError::TooLarge {
            size: None,
            limit: max_bytes,
        }
        .into();
    }
    ApiError::Multipart(err.body_text())
}

/// Map a parser failure onto the dispatcher's error kinds.
fn matrix_error(err: MatrixError, policy: MatrixErrorPolicy) -> ApiError {
    warn!("matrix rejected: {}", err);
    if err.is_csv_syntax() {
        return ApiError::CsvSyntax(err.to_string());
    }
    match policy {
        MatrixErrorPolicy::Internal => ApiError::MatrixProcessing(err),
        MatrixErrorPolicy::BadRequest => ApiError::InvalidMatrix(err),
    }
}
