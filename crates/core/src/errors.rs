use thiserror::Error;

use crate::models::discussion::DiscussionStatus;

#[derive(Error, Debug)]
pub enum SpeakError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rating {0} is outside the allowed range 1-5")]
    InvalidRating(i64),

    #[error("Users cannot leave feedback for themselves")]
    SelfFeedback,

    #[error("Already a member of this discussion")]
    AlreadyMember,

    #[error("Discussion is full")]
    DiscussionFull,

    #[error("Discussion is {0} and not accepting new participants")]
    NotJoinable(DiscussionStatus),

    #[error("Not a member of this discussion")]
    NotMember,

    #[error("Cannot leave a discussion that is {0}")]
    NotLeavable(DiscussionStatus),

    #[error("Cannot move a discussion from {from} to {to}")]
    InvalidTransition {
        from: DiscussionStatus,
        to: DiscussionStatus,
    },

    #[error("Feedback opens once the discussion is completed (currently {0})")]
    FeedbackClosed(DiscussionStatus),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Feedback category already exists: {0}")]
    DuplicateCategory(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Broad grouping of [`SpeakError`] variants, used by callers that only care
/// whether a retry could help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Conflict,
    NotFound,
    Auth,
    Internal,
}

impl SpeakError {
    /// Machine-readable error kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::InvalidRating(_) => "invalid_rating",
            Self::SelfFeedback => "self_feedback",
            Self::AlreadyMember => "already_member",
            Self::DiscussionFull => "discussion_full",
            Self::NotJoinable(_) => "not_joinable",
            Self::NotMember => "not_member",
            Self::NotLeavable(_) => "not_leavable",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::FeedbackClosed(_) => "feedback_closed",
            Self::DuplicateUser(_) => "duplicate_user",
            Self::DuplicateCategory(_) => "duplicate_category",
            Self::NotFound(_) => "not_found",
            Self::Authentication(_) => "unauthorized",
            Self::Authorization(_) => "forbidden",
            Self::Database(_) => "database_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::InvalidRating(_) | Self::SelfFeedback => {
                ErrorClass::Validation
            }
            Self::AlreadyMember
            | Self::DiscussionFull
            | Self::NotJoinable(_)
            | Self::NotMember
            | Self::NotLeavable(_)
            | Self::InvalidTransition { .. }
            | Self::FeedbackClosed(_)
            | Self::DuplicateUser(_)
            | Self::DuplicateCategory(_) => ErrorClass::Conflict,
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Authentication(_) | Self::Authorization(_) => ErrorClass::Auth,
            Self::Database(_) | Self::Internal(_) => ErrorClass::Internal,
        }
    }
}

pub type SpeakResult<T> = Result<T, SpeakError>;
