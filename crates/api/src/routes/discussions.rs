use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/discussions",
            post(handlers::discussions::create_discussion).get(handlers::discussions::list_discussions),
        )
        .route(
            "/api/discussions/:id",
            get(handlers::discussions::get_discussion).delete(handlers::discussions::delete_discussion),
        )
        .route(
            "/api/discussions/:id/status",
            post(handlers::discussions::transition_discussion),
        )
        .route(
            "/api/discussions/:id/join",
            post(handlers::discussions::join_discussion),
        )
        .route(
            "/api/discussions/:id/leave",
            post(handlers::discussions::leave_discussion),
        )
        .route(
            "/api/discussions/:id/participants",
            get(handlers::discussions::list_participants),
        )
}
