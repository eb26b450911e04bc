//! # Authentication Module
//!
//! Password hashing with Argon2, opaque API tokens, and the [`CurrentUser`]
//! extractor that guards every authenticated route.
//!
//! Clients send the token issued at login as either
//! `Authorization: Token <key>` or `Authorization: Bearer <key>`.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use eyre::{Result, eyre};
use rand::{Rng, distributions::Alphanumeric};
use speakspace_core::{
    errors::SpeakError,
    models::user::User,
    repositories::{TokenRepository, UserRepository},
};

use crate::{ApiState, middleware::error_handling::AppError};

pub const TOKEN_LENGTH: usize = 40;

/// Hashes a password using the Argon2 algorithm
///
/// Returns the PHC string (algorithm, parameters, salt and hash), with a
/// fresh random salt per call.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks a password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unparseable hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Pulls the token out of an `Authorization` header.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(token)
    } else {
        None
    }
}

/// The authenticated caller, resolved from the request's token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| {
                SpeakError::Authentication("Authentication credentials were not provided".to_string())
            })?
            .to_string();

        let invalid = || SpeakError::Authentication("Invalid token".to_string());

        let user_id = state.store.resolve_token(&token).await?.ok_or_else(invalid)?;
        let user = state.store.get_user(user_id).await?.ok_or_else(invalid)?;

        Ok(CurrentUser { user, token })
    }
}
