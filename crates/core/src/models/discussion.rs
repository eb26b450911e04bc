use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roster::RosterEntry;

pub const DEFAULT_MAX_PARTICIPANTS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionType {
    Interview,
    GroupDiscussion,
    Debate,
    Presentation,
}

impl DiscussionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionType::Interview => "interview",
            DiscussionType::GroupDiscussion => "group_discussion",
            DiscussionType::Debate => "debate",
            DiscussionType::Presentation => "presentation",
        }
    }
}

impl fmt::Display for DiscussionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscussionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interview" => Ok(DiscussionType::Interview),
            "group_discussion" => Ok(DiscussionType::GroupDiscussion),
            "debate" => Ok(DiscussionType::Debate),
            "presentation" => Ok(DiscussionType::Presentation),
            other => Err(format!("unknown discussion type '{}'", other)),
        }
    }
}

/// Lifecycle of a discussion: `pending -> active -> completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionStatus {
    Pending,
    Active,
    Completed,
}

impl DiscussionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionStatus::Pending => "pending",
            DiscussionStatus::Active => "active",
            DiscussionStatus::Completed => "completed",
        }
    }

    /// The only status that may follow this one, if any.
    pub fn next(&self) -> Option<DiscussionStatus> {
        match self {
            DiscussionStatus::Pending => Some(DiscussionStatus::Active),
            DiscussionStatus::Active => Some(DiscussionStatus::Completed),
            DiscussionStatus::Completed => None,
        }
    }

    /// Roster changes are only allowed before the discussion starts.
    pub fn roster_open(&self) -> bool {
        matches!(self, DiscussionStatus::Pending)
    }
}

impl fmt::Display for DiscussionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscussionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DiscussionStatus::Pending),
            "active" => Ok(DiscussionStatus::Active),
            "completed" => Ok(DiscussionStatus::Completed),
            other => Err(format!("unknown discussion status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub discussion_type: DiscussionType,
    pub created_by: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: i32,
    pub status: DiscussionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDiscussionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discussion_type: DiscussionType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: Option<i32>,
}

/// A discussion that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiscussion {
    pub title: String,
    pub description: String,
    pub discussion_type: DiscussionType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionFilter {
    #[serde(rename = "type")]
    pub discussion_type: Option<DiscussionType>,
    pub status: Option<DiscussionStatus>,
}

impl DiscussionFilter {
    pub fn matches(&self, discussion: &Discussion) -> bool {
        self.discussion_type
            .is_none_or(|t| t == discussion.discussion_type)
            && self.status.is_none_or(|s| s == discussion.status)
    }
}

/// List view of a discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionSummary {
    #[serde(flatten)]
    pub discussion: Discussion,
    pub participants_count: i64,
}

/// Detail view of a discussion including its roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionDetail {
    #[serde(flatten)]
    pub discussion: Discussion,
    pub participants_count: i64,
    pub participants: Vec<RosterEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: DiscussionStatus,
}
