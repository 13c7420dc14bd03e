//! # Matrixops - integer matrix operations over HTTP
//!
//! Matrixops accepts a square integer matrix as a CSV file upload and
//! answers with one of five plain-text results: the matrix itself, its
//! transpose, its flattened elements, their sum or their product.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  multipart  │────▶│   Upload    │────▶│    CSV      │────▶│  Operation  │
//! │   upload    │     │  validator  │     │   parser    │     │ text/plain  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use matrixops::{parse_matrix, Operation};
//!
//! let matrix = parse_matrix(b"1,2\n3,4").unwrap();
//! assert_eq!(Operation::Invert.apply(&matrix).body, "1,3\n2,4");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`config`] - Server configuration from defaults and environment
//! - [`validation`] - Upload policy (presence, size, extension)
//! - [`parser`] - CSV to square matrix
//! - [`matrix`] - Matrix type and operations
//! - [`pipeline`] - Run an operation on a CSV file from disk
//! - [`api`] - HTTP router, dispatcher and server
//! - [`logging`] - Tracing subscriber setup

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Processing
pub mod matrix;
pub mod parser;
pub mod pipeline;
pub mod validation;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ApiError, MatrixError, OperationError, ServerError, UploadError};

// =============================================================================
// Re-exports - Processing
// =============================================================================

pub use matrix::{operations_description, Matrix, Operation, OperationOutput};
pub use parser::{parse_matrix, parse_matrix_file, parse_matrix_str};
pub use pipeline::{run_file, RunError};
pub use validation::{validate_upload, UploadMeta, MAX_UPLOAD_BYTES};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{MatrixErrorPolicy, ServerConfig};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, with_safety_net};
    pub use crate::api::types::AppState;
}
