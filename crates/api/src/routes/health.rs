use axum::{Json, Router, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct VersionResponse {
    name: &'static str,
    version: &'static str,
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(|| async { Json(HealthResponse { status: "ok" }) }))
        .route(
            "/version",
            get(|| async {
                Json(VersionResponse {
                    name: env!("CARGO_PKG_NAME"),
                    version: env!("CARGO_PKG_VERSION"),
                })
            }),
        )
}
