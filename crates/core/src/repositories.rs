//! Storage ports.
//!
//! Every operation that mutates more than one row is a single method here so
//! that implementations can run it inside one transaction. Operations acting
//! on behalf of a user take that user's id explicitly as `caller`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::SpeakResult;
use crate::models::{
    discussion::{Discussion, DiscussionFilter, DiscussionStatus, DiscussionSummary, NewDiscussion},
    feedback::{CreateCategoryRequest, Feedback, FeedbackCategory, SubmitFeedbackRequest},
    roster::{RosterEntry, RosterRole},
    user::{Credentials, NewUser, RoleFilter, UpdateProfileRequest, User},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateUser` when the username or email is taken.
    async fn create_user(&self, new_user: NewUser) -> SpeakResult<User>;

    async fn get_user(&self, id: Uuid) -> SpeakResult<Option<User>>;

    async fn get_credentials(&self, username: &str) -> SpeakResult<Option<Credentials>>;

    async fn update_profile(&self, caller: Uuid, update: UpdateProfileRequest) -> SpeakResult<User>;

    /// Users in registration order.
    async fn list_users(&self, role: RoleFilter) -> SpeakResult<Vec<User>>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn store_token(&self, user_id: Uuid, token: &str) -> SpeakResult<()>;

    async fn resolve_token(&self, token: &str) -> SpeakResult<Option<Uuid>>;

    async fn revoke_token(&self, token: &str) -> SpeakResult<()>;
}

#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    /// Stores the discussion in `pending` status together with the creator's
    /// moderator roster entry.
    async fn create_discussion(&self, creator: Uuid, new_discussion: NewDiscussion) -> SpeakResult<Discussion>;

    /// Discussions in insertion order.
    async fn list_discussions(&self, filter: DiscussionFilter) -> SpeakResult<Vec<DiscussionSummary>>;

    async fn get_discussion(&self, id: Uuid) -> SpeakResult<Option<Discussion>>;

    async fn transition_discussion(
        &self,
        caller: Uuid,
        id: Uuid,
        to: DiscussionStatus,
    ) -> SpeakResult<Discussion>;

    /// Removes the discussion with its roster and feedback.
    async fn delete_discussion(&self, caller: Uuid, id: Uuid) -> SpeakResult<()>;
}

#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Adds `user_id` to the roster and bumps their `discussions_joined`.
    async fn join_discussion(
        &self,
        discussion_id: Uuid,
        user_id: Uuid,
        role: RosterRole,
    ) -> SpeakResult<RosterEntry>;

    async fn leave_discussion(&self, discussion_id: Uuid, user_id: Uuid) -> SpeakResult<()>;

    /// Roster entries in join order.
    async fn list_members(
        &self,
        discussion_id: Uuid,
        role: Option<RosterRole>,
    ) -> SpeakResult<Vec<RosterEntry>>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn list_categories(&self) -> SpeakResult<Vec<FeedbackCategory>>;

    async fn create_category(
        &self,
        caller: Uuid,
        request: CreateCategoryRequest,
    ) -> SpeakResult<FeedbackCategory>;

    /// Persists the feedback and its details and bumps the recipient's
    /// `feedback_received`, all or nothing.
    async fn submit_feedback(
        &self,
        evaluator: Uuid,
        request: SubmitFeedbackRequest,
    ) -> SpeakResult<Feedback>;

    /// Most recent first.
    async fn list_given(&self, evaluator: Uuid) -> SpeakResult<Vec<Feedback>>;

    /// Most recent first.
    async fn list_received(&self, recipient: Uuid) -> SpeakResult<Vec<Feedback>>;

    async fn get_feedback(&self, id: Uuid) -> SpeakResult<Option<Feedback>>;
}

/// Everything the API needs from storage.
pub trait Store:
    UserRepository + TokenRepository + DiscussionRepository + RosterRepository + FeedbackRepository
{
}

impl<T> Store for T where
    T: UserRepository + TokenRepository + DiscussionRepository + RosterRepository + FeedbackRepository
{
}
