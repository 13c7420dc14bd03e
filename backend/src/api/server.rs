//! HTTP server for the matrix API.
//!
//! Every route accepts a `multipart/form-data` upload with one file part
//! named `file` and answers in `text/plain`.
//!
//! # API Endpoints
//!
//! | Method | Path        | Description                          |
//! |--------|-------------|--------------------------------------|
//! | POST   | `/echo`     | Matrix as CSV                        |
//! | POST   | `/invert`   | Transposed matrix as CSV             |
//! | POST   | `/flatten`  | All elements on one line             |
//! | POST   | `/sum`      | Sum of all elements                  |
//! | POST   | `/multiply` | Product of all elements              |

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
    Router,
};
use std::any::Any;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use super::handlers::handle_matrix;
use super::types::AppState;
use crate::config::ServerConfig;
use crate::error::{ApiError, ServerResult};
use crate::matrix::Operation;

/// Room for multipart boundaries and part headers on top of the file
/// itself, so oversized files reach the upload validator.
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Build the application router with one route per operation.
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    let routes = Operation::ALL
        .into_iter()
        .fold(Router::new(), |router, op| {
            router.route(op.route(), operation_route(op))
        })
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    with_safety_net(routes).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Route for one operation. Method checks happen in the dispatcher so
/// every method reaches it.
fn operation_route(op: Operation) -> MethodRouter<AppState> {
    any(move |State(state): State<AppState>, request: Request| async move {
        handle_matrix(state, op.name(), request).await
    })
}

/// Turn panics in any wrapped route into a plain 500 response.
///
/// Applied per request: a panic in one request leaves concurrent
/// requests untouched.
pub fn with_safety_net(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!("request handler panicked: {}", detail);

    ApiError::Internal(detail).into_response()
}

/// Bind and serve until Ctrl+C.
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr = config.addr();
    let app = router(AppState::new(config));

    let listener = TcpListener::bind(addr).await?;
    info!("matrixops listening on http://{}", listener.local_addr()?);
    for op in Operation::ALL {
        info!("   POST {:<10} - {}", op.route(), op.description());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
