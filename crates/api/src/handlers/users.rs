use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use speakspace_core::{
    errors::SpeakError,
    models::user::{
        LoginRequest, LoginResponse, NewUser, RegisterUserRequest, UpdateProfileRequest, User,
        UserListQuery,
    },
    repositories::{TokenRepository, UserRepository},
    rules::directory::{user_not_found, validate_profile_update, validate_registration},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::{self, CurrentUser},
        error_handling::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
};

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<RegisterUserRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    validate_registration(&payload)?;

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state
        .store
        .create_user(NewUser::from_registration(payload, password_hash))
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let rejected = || SpeakError::Authentication("Unable to log in with provided credentials".to_string());

    let credentials = state
        .store
        .get_credentials(payload.username.trim())
        .await?
        .ok_or_else(rejected)?;

    if !auth::verify_password(&payload.password, &credentials.password_hash)? {
        return Err(rejected().into());
    }

    let user = state
        .store
        .get_user(credentials.user_id)
        .await?
        .ok_or_else(|| user_not_found(credentials.user_id))?;

    let token = auth::generate_token();
    state.store.store_token(user.id, &token).await?;
    info!("User {} logged in", user.username);

    Ok(Json(LoginResponse { token, user }))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
) -> Result<StatusCode, AppError> {
    state.store.revoke_token(&caller.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn me(caller: CurrentUser) -> Json<User> {
    Json(caller.user)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn update_me(
    State(state): State<Arc<ApiState>>,
    caller: CurrentUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    validate_profile_update(&payload)?;
    let user = state.store.update_profile(caller.user.id, payload).await?;
    Ok(Json(user))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    _caller: CurrentUser,
    AppQuery(query): AppQuery<UserListQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = state.store.list_users(query.role).await?;
    Ok(Json(users))
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    _caller: CurrentUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(user))
}
