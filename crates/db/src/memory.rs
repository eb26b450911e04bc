//! In-process store used by the test suites.
//!
//! All state sits behind one async mutex, so each trait method is atomic
//! with respect to every other call, which mirrors the transaction plus
//! row lock the Postgres store takes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use speakspace_core::{
    errors::{SpeakError, SpeakResult},
    models::{
        discussion::{Discussion, DiscussionFilter, DiscussionStatus, DiscussionSummary, NewDiscussion},
        feedback::{
            CreateCategoryRequest, Feedback, FeedbackCategory, FeedbackCriteria, SubmitFeedbackRequest,
            default_catalog,
        },
        roster::{RosterEntry, RosterRole},
        user::{Credentials, NewUser, RoleFilter, UpdateProfileRequest, User},
    },
    repositories::{
        DiscussionRepository, FeedbackRepository, RosterRepository, TokenRepository, UserRepository,
    },
    rules::{
        directory::user_not_found,
        ledger,
        registry::{self, discussion_not_found},
        roster,
    },
};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

struct StoredUser {
    user: User,
    password_hash: String,
}

struct State {
    users: Vec<StoredUser>,
    tokens: HashMap<String, Uuid>,
    discussions: Vec<Discussion>,
    roster: Vec<RosterEntry>,
    categories: Vec<FeedbackCategory>,
    feedback: Vec<Feedback>,
    next_category_id: i64,
    next_criteria_id: i64,
}

impl State {
    fn seeded() -> Self {
        let mut state = State {
            users: Vec::new(),
            tokens: HashMap::new(),
            discussions: Vec::new(),
            roster: Vec::new(),
            categories: Vec::new(),
            feedback: Vec::new(),
            next_category_id: 1,
            next_criteria_id: 1,
        };
        for category in default_catalog() {
            state.add_category(category);
        }
        state
    }

    fn add_category(&mut self, request: CreateCategoryRequest) -> FeedbackCategory {
        let id = self.next_category_id;
        self.next_category_id += 1;

        let criteria = request
            .criteria
            .into_iter()
            .map(|item| {
                let criteria_id = self.next_criteria_id;
                self.next_criteria_id += 1;
                FeedbackCriteria {
                    id: criteria_id,
                    category_id: id,
                    name: item.name.trim().to_string(),
                    description: item.description,
                }
            })
            .collect();

        let category = FeedbackCategory {
            id,
            name: request.name.trim().to_string(),
            description: request.description,
            criteria,
        };
        self.categories.push(category.clone());
        category
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().map(|stored| &stored.user).find(|user| user.id == id)
    }

    fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users
            .iter_mut()
            .map(|stored| &mut stored.user)
            .find(|user| user.id == id)
    }

    fn discussion(&self, id: Uuid) -> SpeakResult<&Discussion> {
        self.discussions
            .iter()
            .find(|discussion| discussion.id == id)
            .ok_or_else(|| discussion_not_found(id))
    }

    fn roster_of(&self, discussion_id: Uuid) -> Vec<RosterEntry> {
        self.roster
            .iter()
            .filter(|entry| entry.discussion_id == discussion_id)
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    /// Creates an empty store holding only the default feedback catalog.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::seeded())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> SpeakResult<User> {
        let mut state = self.state.lock().await;

        let taken = state.users.iter().any(|stored| {
            stored.user.username == new_user.username || stored.user.email == new_user.email
        });
        if taken {
            return Err(SpeakError::DuplicateUser(new_user.username));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            bio: String::new(),
            is_mentor: new_user.is_mentor,
            is_participant: new_user.is_participant,
            discussions_joined: 0,
            feedback_received: 0,
            created_at: Utc::now(),
        };
        state.users.push(StoredUser {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });

        debug!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> SpeakResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.user(id).cloned())
    }

    async fn get_credentials(&self, username: &str) -> SpeakResult<Option<Credentials>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.username == username)
            .map(|stored| Credentials {
                user_id: stored.user.id,
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn update_profile(&self, caller: Uuid, update: UpdateProfileRequest) -> SpeakResult<User> {
        let mut state = self.state.lock().await;
        let user = state.user_mut(caller).ok_or_else(|| user_not_found(caller))?;
        update.apply(user);
        Ok(user.clone())
    }

    async fn list_users(&self, role: RoleFilter) -> SpeakResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .map(|stored| &stored.user)
            .filter(|user| role.matches(user))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn store_token(&self, user_id: Uuid, token: &str) -> SpeakResult<()> {
        let mut state = self.state.lock().await;
        state.tokens.insert(token.to_string(), user_id);
        Ok(())
    }

    async fn resolve_token(&self, token: &str) -> SpeakResult<Option<Uuid>> {
        let state = self.state.lock().await;
        Ok(state.tokens.get(token).copied())
    }

    async fn revoke_token(&self, token: &str) -> SpeakResult<()> {
        let mut state = self.state.lock().await;
        state.tokens.remove(token);
        Ok(())
    }
}

#[async_trait]
impl DiscussionRepository for MemoryStore {
    async fn create_discussion(&self, creator: Uuid, new_discussion: NewDiscussion) -> SpeakResult<Discussion> {
        let mut state = self.state.lock().await;
        if state.user(creator).is_none() {
            return Err(user_not_found(creator));
        }

        let now = Utc::now();
        let discussion = Discussion {
            id: Uuid::new_v4(),
            title: new_discussion.title,
            description: new_discussion.description,
            discussion_type: new_discussion.discussion_type,
            created_by: creator,
            start_time: new_discussion.start_time,
            end_time: new_discussion.end_time,
            max_participants: new_discussion.max_participants,
            status: DiscussionStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.discussions.push(discussion.clone());
        state
            .roster
            .push(RosterEntry::new(discussion.id, creator, RosterRole::Moderator));

        info!("Discussion {} created by {}", discussion.id, creator);
        Ok(discussion)
    }

    async fn list_discussions(&self, filter: DiscussionFilter) -> SpeakResult<Vec<DiscussionSummary>> {
        let state = self.state.lock().await;
        Ok(state
            .discussions
            .iter()
            .filter(|discussion| filter.matches(discussion))
            .map(|discussion| DiscussionSummary {
                discussion: discussion.clone(),
                participants_count: roster::participant_count(&state.roster_of(discussion.id)) as i64,
            })
            .collect())
    }

    async fn get_discussion(&self, id: Uuid) -> SpeakResult<Option<Discussion>> {
        let state = self.state.lock().await;
        Ok(state.discussions.iter().find(|d| d.id == id).cloned())
    }

    async fn transition_discussion(
        &self,
        caller: Uuid,
        id: Uuid,
        to: DiscussionStatus,
    ) -> SpeakResult<Discussion> {
        let mut state = self.state.lock().await;
        let current = state.discussion(id)?;
        registry::ensure_creator(current, caller, "change its status")?;
        registry::check_transition(current.status, to)?;

        let discussion = state
            .discussions
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| discussion_not_found(id))?;
        discussion.status = to;
        discussion.updated_at = Utc::now();
        Ok(discussion.clone())
    }

    async fn delete_discussion(&self, caller: Uuid, id: Uuid) -> SpeakResult<()> {
        let mut state = self.state.lock().await;
        registry::ensure_creator(state.discussion(id)?, caller, "delete it")?;

        state.discussions.retain(|d| d.id != id);
        state.roster.retain(|entry| entry.discussion_id != id);
        state.feedback.retain(|feedback| feedback.discussion_id != id);
        Ok(())
    }
}

#[async_trait]
impl RosterRepository for MemoryStore {
    async fn join_discussion(
        &self,
        discussion_id: Uuid,
        user_id: Uuid,
        role: RosterRole,
    ) -> SpeakResult<RosterEntry> {
        let mut state = self.state.lock().await;
        let discussion = state.discussion(discussion_id)?;
        let user = state.user(user_id).ok_or_else(|| user_not_found(user_id))?;
        roster::admit(discussion, &state.roster_of(discussion_id), user, role)?;

        let entry = RosterEntry::new(discussion_id, user_id, role);
        state.roster.push(entry.clone());
        if let Some(user) = state.user_mut(user_id) {
            user.discussions_joined += 1;
        }

        debug!("User {} joined discussion {} as {}", user_id, discussion_id, role);
        Ok(entry)
    }

    async fn leave_discussion(&self, discussion_id: Uuid, user_id: Uuid) -> SpeakResult<()> {
        let mut state = self.state.lock().await;
        let discussion = state.discussion(discussion_id)?;
        let entry_id = roster::release(discussion, &state.roster_of(discussion_id), user_id)?;
        state.roster.retain(|entry| entry.id != entry_id);
        Ok(())
    }

    async fn list_members(
        &self,
        discussion_id: Uuid,
        role: Option<RosterRole>,
    ) -> SpeakResult<Vec<RosterEntry>> {
        let state = self.state.lock().await;
        state.discussion(discussion_id)?;
        Ok(roster::filter_by_role(state.roster_of(discussion_id), role))
    }
}

#[async_trait]
impl FeedbackRepository for MemoryStore {
    async fn list_categories(&self) -> SpeakResult<Vec<FeedbackCategory>> {
        let state = self.state.lock().await;
        Ok(state.categories.clone())
    }

    async fn create_category(
        &self,
        caller: Uuid,
        request: CreateCategoryRequest,
    ) -> SpeakResult<FeedbackCategory> {
        let mut state = self.state.lock().await;
        let user = state.user(caller).ok_or_else(|| user_not_found(caller))?;
        ledger::validate_new_category(user, &request)?;

        let name = request.name.trim();
        if state.categories.iter().any(|category| category.name == name) {
            return Err(SpeakError::DuplicateCategory(name.to_string()));
        }

        Ok(state.add_category(request))
    }

    async fn submit_feedback(
        &self,
        evaluator: Uuid,
        request: SubmitFeedbackRequest,
    ) -> SpeakResult<Feedback> {
        ledger::validate_submission(evaluator, &request)?;

        let mut state = self.state.lock().await;
        let discussion = state.discussion(request.discussion_id)?;
        for user_id in [evaluator, request.recipient_id] {
            if state.user(user_id).is_none() {
                return Err(user_not_found(user_id));
            }
        }
        ledger::ensure_feedback_open(discussion)?;

        let known: HashSet<i64> = state
            .categories
            .iter()
            .flat_map(|category| category.criteria.iter().map(|c| c.id))
            .collect();
        ledger::ensure_known_criteria(&request, &known)?;

        let feedback = request.into_feedback(evaluator);
        state.feedback.push(feedback.clone());
        if let Some(recipient) = state.user_mut(feedback.recipient_id) {
            recipient.feedback_received += 1;
        }

        Ok(feedback)
    }

    async fn list_given(&self, evaluator: Uuid) -> SpeakResult<Vec<Feedback>> {
        let state = self.state.lock().await;
        let mut given: Vec<Feedback> = state
            .feedback
            .iter()
            .rev()
            .filter(|feedback| feedback.evaluator_id == evaluator)
            .cloned()
            .collect();
        ledger::most_recent_first(&mut given);
        Ok(given)
    }

    async fn list_received(&self, recipient: Uuid) -> SpeakResult<Vec<Feedback>> {
        let state = self.state.lock().await;
        let mut received: Vec<Feedback> = state
            .feedback
            .iter()
            .rev()
            .filter(|feedback| feedback.recipient_id == recipient)
            .cloned()
            .collect();
        ledger::most_recent_first(&mut received);
        Ok(received)
    }

    async fn get_feedback(&self, id: Uuid) -> SpeakResult<Option<Feedback>> {
        let state = self.state.lock().await;
        Ok(state.feedback.iter().find(|feedback| feedback.id == id).cloned())
    }
}
