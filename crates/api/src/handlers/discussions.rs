use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use speakspace_core::{
    errors::SpeakError,
    models::{
        discussion::{
            CreateDiscussionRequest, Discussion, DiscussionDetail, DiscussionFilter, DiscussionSummary,
            TransitionRequest,
        },
        roster::{JoinRequest, RosterEntry, RosterQuery},
    },
    repositories::{DiscussionRepository, RosterRepository},
    rules::{
        registry::{discussion_not_found, validate_new_discussion},
        roster::participant_count,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::CurrentUser,
        error_handling::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn create_discussion(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppJson(payload): AppJson<CreateDiscussionRequest>,
) -> Result<(StatusCode, Json<Discussion>), AppError> {
    let new_discussion = validate_new_discussion(payload)?;
    let discussion = state
        .store
        .create_discussion(caller.user.id, new_discussion)
        .await?;

    Ok((StatusCode::CREATED, Json(discussion)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_discussions(
    State(state): State<Arc<ApiState>>,
    _caller: CurrentUser,
    AppQuery(filter): AppQuery<DiscussionFilter>,
) -> Result<Json<Vec<DiscussionSummary>>, AppError> {
    let discussions = state.store.list_discussions(filter).await?;
    Ok(Json(discussions))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_discussion(
    State(state): State<Arc<ApiState>>,
    _caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<DiscussionDetail>, AppError> {
    let discussion = state
        .store
        .get_discussion(id)
        .await?
        .ok_or_else(|| discussion_not_found(id))?;
    let participants = state.store.list_members(id, None).await?;

    Ok(Json(DiscussionDetail {
        participants_count: participant_count(&participants) as i64,
        discussion,
        participants,
    }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn delete_discussion(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_discussion(caller.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn transition_discussion(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<TransitionRequest>,
) -> Result<Json<Discussion>, AppError> {
    let discussion = state
        .store
        .transition_discussion(caller.user.id, id, payload.status)
        .await?;

    Ok(Json(discussion))
}

/// The body is optional; an empty one joins as a participant.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn join_discussion(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
    body: Bytes,
) -> Result<(StatusCode, Json<RosterEntry>), AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        JoinRequest::default()
    } else {
        serde_json::from_slice::<JoinRequest>(&body)
            .map_err(|e| SpeakError::Validation(format!("Invalid join request: {e}")))?
    };

    let entry = state
        .store
        .join_discussion(id, caller.user.id, request.role)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn leave_discussion(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.leave_discussion(id, caller.user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_participants(
    State(state): State<Arc<ApiState>>,
    _caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
    AppQuery(query): AppQuery<RosterQuery>,
) -> Result<Json<Vec<RosterEntry>>, AppError> {
    let members = state.store.list_members(id, query.role).await?;
    Ok(Json(members))
}
