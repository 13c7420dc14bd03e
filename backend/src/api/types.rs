//! Shared state and response types for the HTTP API.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::matrix::operations::{OperationOutput, OVERFLOW_WARNING};

/// State handed to every handler. Read-only.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

/// Successful operation result, sent as `text/plain`.
///
/// Adds a `Warning` header when the operation suspects an overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixResponse(pub OperationOutput);

impl From<OperationOutput> for MatrixResponse {
    fn from(output: OperationOutput) -> Self {
        MatrixResponse(output)
    }
}

impl IntoResponse for MatrixResponse {
    fn into_response(self) -> Response {
        let OperationOutput {
            body,
            overflow_suspected,
        } = self.0;

        let mut response = (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain")],
            body,
        )
            .into_response();

        if overflow_suspected {
            response
                .headers_mut()
                .insert(header::WARNING, HeaderValue::from_static(OVERFLOW_WARNING));
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response() {
        let response = MatrixResponse(OperationOutput {
            body: "10".into(),
            overflow_suspected: false,
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert!(response.headers().get(header::WARNING).is_none());
    }

    #[test]
    fn test_overflow_warning_header() {
        let response = MatrixResponse(OperationOutput {
            body: "0".into(),
            overflow_suspected: true,
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::WARNING],
            "Possible integer overflow detected"
        );
    }
}
