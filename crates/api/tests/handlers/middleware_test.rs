use std::collections::HashMap;

use argon2::PasswordVerifier;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION};
use pretty_assertions::assert_eq;
use rstest::rstest;
use speakspace_api::{
    config::ApiConfig,
    middleware::{auth, error_handling::map_error},
};
use speakspace_core::{errors::SpeakError, models::discussion::DiscussionStatus};
use tracing::Level;

#[rstest]
#[case(SpeakError::Validation("bad input".to_string()), StatusCode::BAD_REQUEST)]
#[case(SpeakError::InvalidRating(9), StatusCode::BAD_REQUEST)]
#[case(SpeakError::SelfFeedback, StatusCode::BAD_REQUEST)]
#[case(SpeakError::AlreadyMember, StatusCode::BAD_REQUEST)]
#[case(SpeakError::DiscussionFull, StatusCode::BAD_REQUEST)]
#[case(SpeakError::NotJoinable(DiscussionStatus::Active), StatusCode::BAD_REQUEST)]
#[case(SpeakError::NotMember, StatusCode::BAD_REQUEST)]
#[case(SpeakError::NotLeavable(DiscussionStatus::Completed), StatusCode::BAD_REQUEST)]
#[case(
    SpeakError::InvalidTransition { from: DiscussionStatus::Pending, to: DiscussionStatus::Completed },
    StatusCode::BAD_REQUEST
)]
#[case(SpeakError::FeedbackClosed(DiscussionStatus::Pending), StatusCode::BAD_REQUEST)]
#[case(SpeakError::DuplicateUser("ada".to_string()), StatusCode::CONFLICT)]
#[case(SpeakError::DuplicateCategory("Content".to_string()), StatusCode::CONFLICT)]
#[case(SpeakError::NotFound("Resource not found".to_string()), StatusCode::NOT_FOUND)]
#[case(SpeakError::Authentication("Invalid token".to_string()), StatusCode::UNAUTHORIZED)]
#[case(SpeakError::Authorization("Not allowed".to_string()), StatusCode::FORBIDDEN)]
#[case(SpeakError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    SpeakError::Internal(Box::new(std::io::Error::other("Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: SpeakError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_kind_and_detail() {
    let response = map_error(SpeakError::DiscussionFull);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["error"], "discussion_full");
    assert!(body["detail"].as_str().is_some_and(|detail| !detail.is_empty()));
}

#[test]
fn test_hash_password() {
    let password = "test_password";
    let hashed = auth::hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));

    // Same password, fresh salt.
    assert_ne!(auth::hash_password(password).unwrap(), hashed);

    let parsed = argon2::PasswordHash::new(&hashed).unwrap();
    assert!(argon2::Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok());
}

#[test]
fn test_verify_password() {
    let hashed = auth::hash_password("test_password").unwrap();

    assert!(auth::verify_password("test_password", &hashed).unwrap());
    assert!(!auth::verify_password("wrong_password", &hashed).unwrap());
    assert!(auth::verify_password("test_password", "not-a-phc-string").is_err());
}

#[test]
fn test_generated_tokens_are_unique_alphanumeric() {
    let first = auth::generate_token();
    let second = auth::generate_token();

    assert_eq!(first.len(), auth::TOKEN_LENGTH);
    assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(first, second);
}

#[rstest]
#[case("Token abc123", Some("abc123"))]
#[case("Bearer abc123", Some("abc123"))]
#[case("bearer   abc123  ", Some("abc123"))]
#[case("Basic abc123", None)]
#[case("Token", None)]
#[case("abc123", None)]
fn test_extract_token(#[case] header: &str, #[case] expected: Option<&str>) {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(header).unwrap());

    assert_eq!(auth::extract_token(&headers), expected);
}

#[test]
fn test_extract_token_without_header() {
    assert_eq!(auth::extract_token(&HeaderMap::new()), None);
}

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/speakspace")])).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_connections, 5);
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.request_timeout, 30);
    assert!(config.cors_origins.is_none());
    assert_eq!(config.server_addr(), "0.0.0.0:3000");
}

#[test]
fn test_config_overrides() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://db/speakspace"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("DATABASE_MAX_CONNECTIONS", "12"),
        ("LOG_LEVEL", "DEBUG"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://speakspace.example"),
        ("API_REQUEST_TIMEOUT_SECONDS", "5"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.max_connections, 12);
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(config.request_timeout, 5);
    assert_eq!(
        config.cors_origins.unwrap(),
        vec![
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("https://speakspace.example"),
        ]
    );
}

#[rstest]
#[case::missing_database_url(&[])]
#[case::bad_port(&[("DATABASE_URL", "postgres://db"), ("API_PORT", "eighty")])]
#[case::bad_pool_size(&[("DATABASE_URL", "postgres://db"), ("DATABASE_MAX_CONNECTIONS", "-1")])]
#[case::bad_cors_origin(&[("DATABASE_URL", "postgres://db"), ("API_CORS_ORIGINS", "http://ok.example,bad\norigin")])]
#[case::wildcard_cors_origin(&[("DATABASE_URL", "postgres://db"), ("API_CORS_ORIGINS", "*")])]
#[case::wildcard_among_origins(&[("DATABASE_URL", "postgres://db"), ("API_CORS_ORIGINS", "http://ok.example, *")])]
#[case::bad_timeout(&[("DATABASE_URL", "postgres://db"), ("API_REQUEST_TIMEOUT_SECONDS", "soon")])]
fn test_config_errors(#[case] pairs: &[(&str, &str)]) {
    assert!(ApiConfig::from_lookup(lookup(pairs)).is_err());
}
