use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile of a registered user.
///
/// The counters are maintained by the roster and feedback stores and are
/// never accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub is_mentor: bool,
    pub is_participant: bool,
    pub discussions_joined: i64,
    pub feedback_received: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_mentor: bool,
}

/// A validated registration, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_mentor: bool,
    pub is_participant: bool,
}

impl NewUser {
    /// Mentors register as non-participants; everyone else as a participant.
    pub fn from_registration(request: RegisterUserRequest, password_hash: String) -> Self {
        Self {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            is_mentor: request.is_mentor,
            is_participant: !request.is_mentor,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    pub fn apply(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(bio) = &self.bio {
            user.bio = bio.clone();
        }
    }
}

/// Stored login material for a username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    Mentor,
    Participant,
    #[default]
    All,
}

impl RoleFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            RoleFilter::Mentor => user.is_mentor,
            RoleFilter::Participant => user.is_participant,
            RoleFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub role: RoleFilter,
}
