use uuid::Uuid;

use crate::errors::{SpeakError, SpeakResult};
use crate::models::discussion::{
    CreateDiscussionRequest, DEFAULT_MAX_PARTICIPANTS, Discussion, DiscussionStatus, NewDiscussion,
};

const MAX_TITLE_LEN: usize = 255;

/// Validates a create request and fills in defaults.
pub fn validate_new_discussion(request: CreateDiscussionRequest) -> SpeakResult<NewDiscussion> {
    let title = request.title.trim().to_string();
    if title.is_empty() {
        return Err(SpeakError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(SpeakError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    if request.end_time <= request.start_time {
        return Err(SpeakError::Validation(
            "end_time must be after start_time".to_string(),
        ));
    }

    let max_participants = request.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS);
    if max_participants < 1 {
        return Err(SpeakError::Validation(
            "max_participants must be at least 1".to_string(),
        ));
    }

    Ok(NewDiscussion {
        title,
        description: request.description,
        discussion_type: request.discussion_type,
        start_time: request.start_time,
        end_time: request.end_time,
        max_participants,
    })
}

/// Only `pending -> active` and `active -> completed` are allowed.
pub fn check_transition(from: DiscussionStatus, to: DiscussionStatus) -> SpeakResult<()> {
    if from.next() == Some(to) {
        Ok(())
    } else {
        Err(SpeakError::InvalidTransition { from, to })
    }
}

pub fn ensure_creator(discussion: &Discussion, caller: Uuid, action: &str) -> SpeakResult<()> {
    if discussion.created_by == caller {
        Ok(())
    } else {
        Err(SpeakError::Authorization(format!(
            "only the creator of a discussion may {}",
            action
        )))
    }
}

pub fn discussion_not_found(id: Uuid) -> SpeakError {
    SpeakError::NotFound(format!("Discussion with ID {} not found", id))
}
