use uuid::Uuid;

use crate::errors::{SpeakError, SpeakResult};
use crate::models::{
    discussion::Discussion,
    roster::{RosterEntry, RosterRole},
    user::User,
};

/// Number of entries that count against the discussion's capacity.
pub fn participant_count(roster: &[RosterEntry]) -> usize {
    roster
        .iter()
        .filter(|entry| entry.role == RosterRole::Participant)
        .count()
}

/// Decides whether `user` may join `discussion` with `role`, given the
/// discussion's current roster.
///
/// Checks run in a fixed order: status, membership, capacity, role
/// eligibility.
pub fn admit(
    discussion: &Discussion,
    roster: &[RosterEntry],
    user: &User,
    role: RosterRole,
) -> SpeakResult<()> {
    if !discussion.status.roster_open() {
        return Err(SpeakError::NotJoinable(discussion.status));
    }

    if roster.iter().any(|entry| entry.user_id == user.id) {
        return Err(SpeakError::AlreadyMember);
    }

    match role {
        RosterRole::Participant => {
            let capacity = usize::try_from(discussion.max_participants).unwrap_or(0);
            if participant_count(roster) >= capacity {
                return Err(SpeakError::DiscussionFull);
            }
        }
        RosterRole::Evaluator => {
            if !user.is_mentor {
                return Err(SpeakError::Authorization(
                    "only mentors may join as evaluators".to_string(),
                ));
            }
        }
        RosterRole::Moderator => {
            return Err(SpeakError::Validation(
                "moderators are assigned when the discussion is created".to_string(),
            ));
        }
    }

    Ok(())
}

/// Finds the entry `user_id` holds and checks that it may be removed.
/// Returns the id of the entry to delete.
///
/// The moderator seat belongs to the creator for the discussion's lifetime.
pub fn release(discussion: &Discussion, roster: &[RosterEntry], user_id: Uuid) -> SpeakResult<Uuid> {
    if !discussion.status.roster_open() {
        return Err(SpeakError::NotLeavable(discussion.status));
    }

    let entry = roster
        .iter()
        .find(|entry| entry.user_id == user_id)
        .ok_or(SpeakError::NotMember)?;

    if entry.role == RosterRole::Moderator {
        return Err(SpeakError::Validation(
            "the moderator cannot leave their own discussion".to_string(),
        ));
    }

    Ok(entry.id)
}

pub fn filter_by_role(roster: Vec<RosterEntry>, role: Option<RosterRole>) -> Vec<RosterEntry> {
    match role {
        Some(role) => roster.into_iter().filter(|entry| entry.role == role).collect(),
        None => roster,
    }
}
