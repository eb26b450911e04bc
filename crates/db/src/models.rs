use chrono::{DateTime, Utc};
use eyre::{Report, eyre};
use serde::{Deserialize, Serialize};
use speakspace_core::models::{
    discussion::Discussion,
    feedback::{FeedbackCategory, FeedbackCriteria, FeedbackDetail},
    roster::RosterEntry,
    user::User,
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub is_mentor: bool,
    pub is_participant: bool,
    pub discussions_joined: i64,
    pub feedback_received: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            is_mentor: row.is_mentor,
            is_participant: row.is_participant,
            discussions_joined: row.discussions_joined,
            feedback_received: row.feedback_received,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDiscussion {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub discussion_type: String,
    pub created_by: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbDiscussion> for Discussion {
    type Error = Report;

    fn try_from(row: DbDiscussion) -> Result<Self, Self::Error> {
        Ok(Discussion {
            id: row.id,
            title: row.title,
            description: row.description,
            discussion_type: row.discussion_type.parse().map_err(|e: String| eyre!(e))?,
            created_by: row.created_by,
            start_time: row.start_time,
            end_time: row.end_time,
            max_participants: row.max_participants,
            status: row.status.parse().map_err(|e: String| eyre!(e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Discussion row joined with its participant count.
#[derive(Debug, Clone, FromRow)]
pub struct DbDiscussionWithCount {
    #[sqlx(flatten)]
    pub discussion: DbDiscussion,
    pub participants_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRosterEntry {
    pub id: Uuid,
    pub discussion_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl TryFrom<DbRosterEntry> for RosterEntry {
    type Error = Report;

    fn try_from(row: DbRosterEntry) -> Result<Self, Self::Error> {
        Ok(RosterEntry {
            id: row.id,
            discussion_id: row.discussion_id,
            user_id: row.user_id,
            role: row.role.parse().map_err(|e: String| eyre!(e))?,
            joined_at: row.joined_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFeedbackCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFeedbackCriteria {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: String,
}

impl From<DbFeedbackCriteria> for FeedbackCriteria {
    fn from(row: DbFeedbackCriteria) -> Self {
        FeedbackCriteria {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            description: row.description,
        }
    }
}

impl DbFeedbackCategory {
    pub fn with_criteria(self, criteria: Vec<FeedbackCriteria>) -> FeedbackCategory {
        FeedbackCategory {
            id: self.id,
            name: self.name,
            description: self.description,
            criteria,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFeedback {
    pub id: Uuid,
    pub discussion_id: Uuid,
    pub evaluator_id: Uuid,
    pub recipient_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbFeedbackDetail {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub criteria_id: i64,
    pub rating: i32,
    pub comment: String,
}

impl From<DbFeedbackDetail> for FeedbackDetail {
    fn from(row: DbFeedbackDetail) -> Self {
        FeedbackDetail {
            id: row.id,
            criteria_id: row.criteria_id,
            rating: i64::from(row.rating),
            comment: row.comment,
        }
    }
}
