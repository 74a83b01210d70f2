//! Demo routes exercising the formatter end to end.

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// GET /health -- service liveness and version.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Greeting payload returned by `GET /greet/{name}`.
#[derive(Serialize)]
pub struct Greeting {
    pub greeting: String,
}

/// GET /greet/{name} -- JSON-bodied demo route with a validation error path.
async fn greet(Path(name): Path<String>) -> ApiResult<Json<Greeting>> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()));
    }

    Ok(Json(Greeting {
        greeting: format!("hello, {name}"),
    }))
}

/// GET /motd -- plain-text demo route.
async fn motd() -> &'static str {
    "all services nominal"
}

/// Mount all routes.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/greet/{name}", get(greet))
        .route("/motd", get(motd))
}
