//! HTTP API module.
//!
//! This module provides the HTTP server, the request dispatcher and the
//! response types for the matrix service.

pub mod handlers;
pub mod server;
pub mod types;

pub use handlers::{handle_matrix, FILE_FIELD};
pub use server::{router, start_server, with_safety_net};
pub use types::{AppState, MatrixResponse};
