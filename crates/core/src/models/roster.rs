use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterRole {
    #[default]
    Participant,
    Moderator,
    Evaluator,
}

impl RosterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterRole::Participant => "participant",
            RosterRole::Moderator => "moderator",
            RosterRole::Evaluator => "evaluator",
        }
    }
}

impl fmt::Display for RosterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RosterRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "participant" => Ok(RosterRole::Participant),
            "moderator" => Ok(RosterRole::Moderator),
            "evaluator" => Ok(RosterRole::Evaluator),
            other => Err(format!("unknown roster role '{}'", other)),
        }
    }
}

/// Membership of one user in one discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: Uuid,
    pub discussion_id: Uuid,
    pub user_id: Uuid,
    pub role: RosterRole,
    pub joined_at: DateTime<Utc>,
}

impl RosterEntry {
    pub fn new(discussion_id: Uuid, user_id: Uuid, role: RosterRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            discussion_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub role: RosterRole,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterQuery {
    pub role: Option<RosterRole>,
}
