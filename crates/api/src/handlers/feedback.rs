use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use speakspace_core::{
    models::feedback::{CreateCategoryRequest, Feedback, FeedbackCategory, SubmitFeedbackRequest},
    repositories::FeedbackRepository,
    rules::ledger,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::CurrentUser,
        error_handling::AppError,
        extract::{AppJson, AppPath},
    },
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_categories(
    State(state): State<Arc<ApiState>>,
    _caller: CurrentUser,
) -> Result<Json<Vec<FeedbackCategory>>, AppError> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_category(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppJson(payload): AppJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<FeedbackCategory>), AppError> {
    let category = state.store.create_category(caller.user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn submit_feedback(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppJson(payload): AppJson<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    let feedback = state.store.submit_feedback(caller.user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_given(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
) -> Result<Json<Vec<Feedback>>, AppError> {
    let feedback = state.store.list_given(caller.user.id).await?;
    Ok(Json(feedback))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_received(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
) -> Result<Json<Vec<Feedback>>, AppError> {
    let feedback = state.store.list_received(caller.user.id).await?;
    Ok(Json(feedback))
}

/// Everything the caller gave or received, most recent first.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_feedback(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
) -> Result<Json<Vec<Feedback>>, AppError> {
    let mut feedback = state.store.list_given(caller.user.id).await?;
    feedback.extend(state.store.list_received(caller.user.id).await?);
    ledger::most_recent_first(&mut feedback);
    Ok(Json(feedback))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_feedback(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Feedback>, AppError> {
    let feedback = state
        .store
        .get_feedback(id)
        .await?
        .filter(|feedback| ledger::involves(feedback, caller.user.id))
        .ok_or_else(|| ledger::feedback_not_found(id))?;
    Ok(Json(feedback))
}
