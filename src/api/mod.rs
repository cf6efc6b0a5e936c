//! HTTP endpoint layer
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET  | `/` | service info |
//! | GET  | `/healthz` | `{"status": "ok"}` |
//! | GET  | `/experiments` | `[{"commit_hash", "experiment_name"}]` |
//! | GET  | `/experiments/:experiment_id/params` | parameter mapping |
//! | POST | `/experiments/:experiment_id/apply` | `{"success", "message", "experiment_name"}` |
//!
//! Errors are returned as `{"error": {"code": "...", "message": "..."}}` with
//! status 400, 404 or 500.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dvc_exp_api::api::build_router;
//! use dvc_exp_api::repository::DvcRepository;
//!
//! # async fn example() -> std::io::Result<()> {
//! let app = build_router(Arc::new(DvcRepository::new(".")));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

mod error;
mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tracing::{info, Instrument};

use crate::repository::ExperimentRepository;

/// Build the application router over `repo`.
pub fn build_router<R: ExperimentRepository + 'static>(repo: Arc<R>) -> Router {
    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .route("/experiments", get(handlers::list_experiments_handler::<R>))
        .route(
            "/experiments/:experiment_id/params",
            get(handlers::experiment_params_handler::<R>),
        )
        .route(
            "/experiments/:experiment_id/apply",
            post(handlers::apply_experiment_handler::<R>),
        )
        .layer(middleware::from_fn(request_tracing_middleware))
        .with_state(repo)
}

async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, path = %path);

    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "request completed"
        );
    });
    response
}
