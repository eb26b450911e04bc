//! PostgreSQL implementation of the storage ports.
//!
//! Each trait method runs in its own transaction. Roster and status changes
//! take a `FOR UPDATE` lock on the discussion row first, so concurrent joins
//! on one discussion are serialized and the capacity check cannot race.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use eyre::Report;
use speakspace_core::{
    errors::{SpeakError, SpeakResult},
    models::{
        discussion::{Discussion, DiscussionFilter, DiscussionStatus, DiscussionSummary, NewDiscussion},
        feedback::{CreateCategoryRequest, Feedback, FeedbackCategory, FeedbackCriteria, FeedbackDetail, SubmitFeedbackRequest},
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
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    DbPool,
    models::{DbFeedback, DbRosterEntry},
    repositories::{self, is_unique_violation},
};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn attach_details(&self, rows: Vec<DbFeedback>) -> SpeakResult<Vec<Feedback>> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut details: HashMap<Uuid, Vec<FeedbackDetail>> = HashMap::new();
        for detail in repositories::feedback::get_details_for_feedback(&self.pool, &ids).await? {
            details
                .entry(detail.feedback_id)
                .or_default()
                .push(detail.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Feedback {
                details: details.remove(&row.id).unwrap_or_default(),
                id: row.id,
                discussion_id: row.discussion_id,
                evaluator_id: row.evaluator_id,
                recipient_id: row.recipient_id,
                created_at: row.created_at,
            })
            .collect())
    }
}

fn sql(err: sqlx::Error) -> SpeakError {
    SpeakError::Database(Report::new(err))
}

fn roster_entries(rows: Vec<DbRosterEntry>) -> SpeakResult<Vec<RosterEntry>> {
    rows.into_iter()
        .map(RosterEntry::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(SpeakError::Database)
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, new_user: NewUser) -> SpeakResult<User> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        if repositories::user::username_or_email_taken(&mut *tx, &new_user.username, &new_user.email).await? {
            return Err(SpeakError::DuplicateUser(new_user.username));
        }

        let row = repositories::user::create_user(&mut *tx, &new_user)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SpeakError::DuplicateUser(new_user.username.clone())
                } else {
                    SpeakError::Database(e)
                }
            })?;

        tx.commit().await.map_err(sql)?;
        info!("Registered user {} ({})", row.username, row.id);
        Ok(row.into())
    }

    async fn get_user(&self, id: Uuid) -> SpeakResult<Option<User>> {
        let row = repositories::user::get_user_by_id(&self.pool, id).await?;
        Ok(row.map(User::from))
    }

    async fn get_credentials(&self, username: &str) -> SpeakResult<Option<Credentials>> {
        let row = repositories::user::get_user_by_username(&self.pool, username).await?;
        Ok(row.map(|row| Credentials {
            user_id: row.id,
            password_hash: row.password_hash,
        }))
    }

    async fn update_profile(&self, caller: Uuid, update: UpdateProfileRequest) -> SpeakResult<User> {
        let row = repositories::user::update_profile(&self.pool, caller, &update)
            .await?
            .ok_or_else(|| user_not_found(caller))?;
        Ok(row.into())
    }

    async fn list_users(&self, role: RoleFilter) -> SpeakResult<Vec<User>> {
        let rows = repositories::user::list_users(&self.pool, role).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl TokenRepository for PgStore {
    async fn store_token(&self, user_id: Uuid, token: &str) -> SpeakResult<()> {
        repositories::token::insert_token(&self.pool, user_id, token).await?;
        Ok(())
    }

    async fn resolve_token(&self, token: &str) -> SpeakResult<Option<Uuid>> {
        Ok(repositories::token::get_token_owner(&self.pool, token).await?)
    }

    async fn revoke_token(&self, token: &str) -> SpeakResult<()> {
        repositories::token::delete_token(&self.pool, token).await?;
        Ok(())
    }
}

#[async_trait]
impl DiscussionRepository for PgStore {
    async fn create_discussion(&self, creator: Uuid, new_discussion: NewDiscussion) -> SpeakResult<Discussion> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        if repositories::user::get_user_by_id(&mut *tx, creator).await?.is_none() {
            return Err(user_not_found(creator));
        }

        let discussion: Discussion =
            repositories::discussion::create_discussion(&mut *tx, creator, &new_discussion)
                .await?
                .try_into()?;

        let moderator = RosterEntry::new(discussion.id, creator, RosterRole::Moderator);
        repositories::roster::insert_entry(&mut *tx, &moderator).await?;

        tx.commit().await.map_err(sql)?;
        info!("Discussion {} created by {}", discussion.id, creator);
        Ok(discussion)
    }

    async fn list_discussions(&self, filter: DiscussionFilter) -> SpeakResult<Vec<DiscussionSummary>> {
        let rows = repositories::discussion::list_discussions(&self.pool, &filter).await?;

        rows.into_iter()
            .map(|row| -> SpeakResult<DiscussionSummary> {
                Ok(DiscussionSummary {
                    discussion: row.discussion.try_into()?,
                    participants_count: row.participants_count,
                })
            })
            .collect()
    }

    async fn get_discussion(&self, id: Uuid) -> SpeakResult<Option<Discussion>> {
        let row = repositories::discussion::get_discussion_by_id(&self.pool, id).await?;
        Ok(row.map(Discussion::try_from).transpose()?)
    }

    async fn transition_discussion(
        &self,
        caller: Uuid,
        id: Uuid,
        to: DiscussionStatus,
    ) -> SpeakResult<Discussion> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        let discussion: Discussion = repositories::discussion::lock_discussion(&mut *tx, id)
            .await?
            .ok_or_else(|| discussion_not_found(id))?
            .try_into()?;

        registry::ensure_creator(&discussion, caller, "change its status")?;
        if let Err(e) = registry::check_transition(discussion.status, to) {
            warn!("Rejected status change for discussion {}: {}", id, e);
            return Err(e);
        }

        let updated: Discussion = repositories::discussion::update_status(&mut *tx, id, to)
            .await?
            .try_into()?;

        tx.commit().await.map_err(sql)?;
        info!("Discussion {} moved from {} to {}", id, discussion.status, to);
        Ok(updated)
    }

    async fn delete_discussion(&self, caller: Uuid, id: Uuid) -> SpeakResult<()> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        let discussion: Discussion = repositories::discussion::lock_discussion(&mut *tx, id)
            .await?
            .ok_or_else(|| discussion_not_found(id))?
            .try_into()?;

        registry::ensure_creator(&discussion, caller, "delete it")?;
        repositories::discussion::delete_discussion(&mut *tx, id).await?;

        tx.commit().await.map_err(sql)?;
        info!("Discussion {} deleted by {}", id, caller);
        Ok(())
    }
}

#[async_trait]
impl RosterRepository for PgStore {
    async fn join_discussion(
        &self,
        discussion_id: Uuid,
        user_id: Uuid,
        role: RosterRole,
    ) -> SpeakResult<RosterEntry> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        let discussion: Discussion = repositories::discussion::lock_discussion(&mut *tx, discussion_id)
            .await?
            .ok_or_else(|| discussion_not_found(discussion_id))?
            .try_into()?;

        let user: User = repositories::user::get_user_by_id(&mut *tx, user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?
            .into();

        let entries = roster_entries(
            repositories::roster::get_entries_by_discussion_id(&mut *tx, discussion_id).await?,
        )?;
        roster::admit(&discussion, &entries, &user, role)?;

        let entry = RosterEntry::new(discussion_id, user_id, role);
        let row = repositories::roster::insert_entry(&mut *tx, &entry)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SpeakError::AlreadyMember
                } else {
                    SpeakError::Database(e)
                }
            })?;
        repositories::user::increment_discussions_joined(&mut *tx, user_id).await?;

        tx.commit().await.map_err(sql)?;
        info!("User {} joined discussion {} as {}", user_id, discussion_id, role);
        Ok(RosterEntry::try_from(row)?)
    }

    async fn leave_discussion(&self, discussion_id: Uuid, user_id: Uuid) -> SpeakResult<()> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        let discussion: Discussion = repositories::discussion::lock_discussion(&mut *tx, discussion_id)
            .await?
            .ok_or_else(|| discussion_not_found(discussion_id))?
            .try_into()?;

        let entries = roster_entries(
            repositories::roster::get_entries_by_discussion_id(&mut *tx, discussion_id).await?,
        )?;
        let entry_id = roster::release(&discussion, &entries, user_id)?;
        repositories::roster::delete_entry(&mut *tx, entry_id).await?;

        tx.commit().await.map_err(sql)?;
        info!("User {} left discussion {}", user_id, discussion_id);
        Ok(())
    }

    async fn list_members(
        &self,
        discussion_id: Uuid,
        role: Option<RosterRole>,
    ) -> SpeakResult<Vec<RosterEntry>> {
        if repositories::discussion::get_discussion_by_id(&self.pool, discussion_id)
            .await?
            .is_none()
        {
            return Err(discussion_not_found(discussion_id));
        }

        let entries = roster_entries(
            repositories::roster::get_entries_by_discussion_id(&self.pool, discussion_id).await?,
        )?;
        Ok(roster::filter_by_role(entries, role))
    }
}

#[async_trait]
impl FeedbackRepository for PgStore {
    async fn list_categories(&self) -> SpeakResult<Vec<FeedbackCategory>> {
        let categories = repositories::feedback::get_categories(&self.pool).await?;
        let mut criteria: HashMap<i64, Vec<FeedbackCriteria>> = HashMap::new();
        for row in repositories::feedback::get_criteria(&self.pool).await? {
            criteria.entry(row.category_id).or_default().push(row.into());
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let items = criteria.remove(&category.id).unwrap_or_default();
                category.with_criteria(items)
            })
            .collect())
    }

    async fn create_category(
        &self,
        caller: Uuid,
        request: CreateCategoryRequest,
    ) -> SpeakResult<FeedbackCategory> {
        let mut tx = self.pool.begin().await.map_err(sql)?;

        let user: User = repositories::user::get_user_by_id(&mut *tx, caller)
            .await?
            .ok_or_else(|| user_not_found(caller))?
            .into();
        ledger::validate_new_category(&user, &request)?;

        let name = request.name.trim();
        if repositories::feedback::category_name_taken(&mut *tx, name).await? {
            return Err(SpeakError::DuplicateCategory(name.to_string()));
        }

        let category = repositories::feedback::insert_category(&mut *tx, name, &request.description).await?;
        let mut criteria = Vec::with_capacity(request.criteria.len());
        for item in &request.criteria {
            criteria.push(
                repositories::feedback::insert_criteria(&mut *tx, category.id, item)
                    .await?
                    .into(),
            );
        }

        tx.commit().await.map_err(sql)?;
        info!("Feedback category {} created by {}", category.name, caller);
        Ok(category.with_criteria(criteria))
    }

    async fn submit_feedback(
        &self,
        evaluator: Uuid,
        request: SubmitFeedbackRequest,
    ) -> SpeakResult<Feedback> {
        ledger::validate_submission(evaluator, &request)?;

        let mut tx = self.pool.begin().await.map_err(sql)?;

        let discussion: Discussion =
            repositories::discussion::get_discussion_by_id(&mut *tx, request.discussion_id)
                .await?
                .ok_or_else(|| discussion_not_found(request.discussion_id))?
                .try_into()?;

        for user_id in [evaluator, request.recipient_id] {
            if repositories::user::get_user_by_id(&mut *tx, user_id).await?.is_none() {
                return Err(user_not_found(user_id));
            }
        }

        ledger::ensure_feedback_open(&discussion)?;

        let wanted: Vec<i64> = request.details.iter().map(|d| d.criteria_id).collect();
        let known: HashSet<i64> = repositories::feedback::get_criteria_ids(&mut *tx, &wanted)
            .await?
            .into_iter()
            .collect();
        ledger::ensure_known_criteria(&request, &known)?;

        let feedback = request.into_feedback(evaluator);
        repositories::feedback::insert_feedback(&mut *tx, &feedback).await?;
        for detail in &feedback.details {
            repositories::feedback::insert_detail(&mut *tx, feedback.id, detail).await?;
        }
        repositories::user::increment_feedback_received(&mut *tx, feedback.recipient_id).await?;

        tx.commit().await.map_err(sql)?;
        info!(
            "Feedback {} from {} to {} on discussion {}",
            feedback.id, evaluator, feedback.recipient_id, feedback.discussion_id
        );
        Ok(feedback)
    }

    async fn list_given(&self, evaluator: Uuid) -> SpeakResult<Vec<Feedback>> {
        let rows = repositories::feedback::get_feedback_by_evaluator(&self.pool, evaluator).await?;
        self.attach_details(rows).await
    }

    async fn list_received(&self, recipient: Uuid) -> SpeakResult<Vec<Feedback>> {
        let rows = repositories::feedback::get_feedback_by_recipient(&self.pool, recipient).await?;
        self.attach_details(rows).await
    }

    async fn get_feedback(&self, id: Uuid) -> SpeakResult<Option<Feedback>> {
        let rows: Vec<DbFeedback> = repositories::feedback::get_feedback_by_id(&self.pool, id)
            .await?
            .into_iter()
            .collect();
        Ok(self.attach_details(rows).await?.pop())
    }
}
