use async_trait::async_trait;
use mockall::mock;
use speakspace_core::{
    errors::SpeakResult,
    models::{
        discussion::{Discussion, DiscussionFilter, DiscussionStatus, DiscussionSummary, NewDiscussion},
        feedback::{CreateCategoryRequest, Feedback, FeedbackCategory, SubmitFeedbackRequest},
        roster::{RosterEntry, RosterRole},
        user::{Credentials, NewUser, RoleFilter, UpdateProfileRequest, User},
    },
    repositories::{
        DiscussionRepository, FeedbackRepository, RosterRepository, TokenRepository, UserRepository,
    },
};
use uuid::Uuid;

// Mock store for exercising failure paths without a database
mock! {
    pub Store {}

    #[async_trait]
    impl UserRepository for Store {
        async fn create_user(&self, new_user: NewUser) -> SpeakResult<User>;
        async fn get_user(&self, id: Uuid) -> SpeakResult<Option<User>>;
        async fn get_credentials(&self, username: &str) -> SpeakResult<Option<Credentials>>;
        async fn update_profile(&self, caller: Uuid, update: UpdateProfileRequest) -> SpeakResult<User>;
        async fn list_users(&self, role: RoleFilter) -> SpeakResult<Vec<User>>;
    }

    #[async_trait]
    impl TokenRepository for Store {
        async fn store_token(&self, user_id: Uuid, token: &str) -> SpeakResult<()>;
        async fn resolve_token(&self, token: &str) -> SpeakResult<Option<Uuid>>;
        async fn revoke_token(&self, token: &str) -> SpeakResult<()>;
    }

    #[async_trait]
    impl DiscussionRepository for Store {
        async fn create_discussion(&self, creator: Uuid, new_discussion: NewDiscussion) -> SpeakResult<Discussion>;
        async fn list_discussions(&self, filter: DiscussionFilter) -> SpeakResult<Vec<DiscussionSummary>>;
        async fn get_discussion(&self, id: Uuid) -> SpeakResult<Option<Discussion>>;
        async fn transition_discussion(
            &self,
            caller: Uuid,
            id: Uuid,
            to: DiscussionStatus,
        ) -> SpeakResult<Discussion>;
        async fn delete_discussion(&self, caller: Uuid, id: Uuid) -> SpeakResult<()>;
    }

    #[async_trait]
    impl RosterRepository for Store {
        async fn join_discussion(
            &self,
            discussion_id: Uuid,
            user_id: Uuid,
            role: RosterRole,
        ) -> SpeakResult<RosterEntry>;
        async fn leave_discussion(&self, discussion_id: Uuid, user_id: Uuid) -> SpeakResult<()>;
        async fn list_members(
            &self,
            discussion_id: Uuid,
            role: Option<RosterRole>,
        ) -> SpeakResult<Vec<RosterEntry>>;
    }

    #[async_trait]
    impl FeedbackRepository for Store {
        async fn list_categories(&self) -> SpeakResult<Vec<FeedbackCategory>>;
        async fn create_category(
            &self,
            caller: Uuid,
            request: CreateCategoryRequest,
        ) -> SpeakResult<FeedbackCategory>;
        async fn submit_feedback(
            &self,
            evaluator: Uuid,
            request: SubmitFeedbackRequest,
        ) -> SpeakResult<Feedback>;
        async fn list_given(&self, evaluator: Uuid) -> SpeakResult<Vec<Feedback>>;
        async fn list_received(&self, recipient: Uuid) -> SpeakResult<Vec<Feedback>>;
        async fn get_feedback(&self, id: Uuid) -> SpeakResult<Option<Feedback>>;
    }
}
