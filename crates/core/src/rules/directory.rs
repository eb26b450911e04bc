use uuid::Uuid;

use crate::errors::{SpeakError, SpeakResult};
use crate::models::user::{RegisterUserRequest, UpdateProfileRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_NAME_LEN: usize = 150;

fn ensure_max_len(field: &str, value: &str, max: usize) -> SpeakResult<()> {
    if value.chars().count() > max {
        return Err(SpeakError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub fn validate_registration(request: &RegisterUserRequest) -> SpeakResult<()> {
    if request.username.trim().is_empty() {
        return Err(SpeakError::Validation("username is required".to_string()));
    }
    ensure_max_len("username", request.username.trim(), MAX_USERNAME_LEN)?;
    ensure_max_len("email", &request.email.trim().to_lowercase(), MAX_EMAIL_LEN)?;
    if !looks_like_email(request.email.trim()) {
        return Err(SpeakError::Validation(format!(
            "'{}' is not a valid email address",
            request.email
        )));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SpeakError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if request.password != request.confirm_password {
        return Err(SpeakError::Validation("Passwords don't match".to_string()));
    }
    ensure_max_len("first_name", &request.first_name, MAX_NAME_LEN)?;
    ensure_max_len("last_name", &request.last_name, MAX_NAME_LEN)
}

pub fn validate_profile_update(update: &UpdateProfileRequest) -> SpeakResult<()> {
    if let Some(first_name) = &update.first_name {
        ensure_max_len("first_name", first_name, MAX_NAME_LEN)?;
    }
    if let Some(last_name) = &update.last_name {
        ensure_max_len("last_name", last_name, MAX_NAME_LEN)?;
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

pub fn user_not_found(id: Uuid) -> SpeakError {
    SpeakError::NotFound(format!("User with ID {} not found", id))
}
