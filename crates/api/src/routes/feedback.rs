use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/feedback/categories",
            get(handlers::feedback::list_categories).post(handlers::feedback::create_category),
        )
        .route(
            "/api/feedback",
            get(handlers::feedback::list_feedback).post(handlers::feedback::submit_feedback),
        )
        .route("/api/feedback/given", get(handlers::feedback::list_given))
        .route("/api/feedback/received", get(handlers::feedback::list_received))
        .route("/api/feedback/:id", get(handlers::feedback::get_feedback))
}
