use std::collections::HashSet;

use uuid::Uuid;

use crate::errors::{SpeakError, SpeakResult};
use crate::models::{
    discussion::{Discussion, DiscussionStatus},
    feedback::{CreateCategoryRequest, Feedback, MAX_RATING, MIN_RATING, SubmitFeedbackRequest},
    user::User,
};

pub const MAX_CATALOG_NAME_LEN: usize = 100;

/// Input checks that need no stored state.
pub fn validate_submission(evaluator: Uuid, request: &SubmitFeedbackRequest) -> SpeakResult<()> {
    if request.details.is_empty() {
        return Err(SpeakError::Validation(
            "feedback needs at least one detail".to_string(),
        ));
    }

    if let Some(detail) = request
        .details
        .iter()
        .find(|detail| !(MIN_RATING..=MAX_RATING).contains(&detail.rating))
    {
        return Err(SpeakError::InvalidRating(detail.rating));
    }

    if evaluator == request.recipient_id {
        return Err(SpeakError::SelfFeedback);
    }

    let mut seen = HashSet::new();
    if let Some(detail) = request.details.iter().find(|detail| !seen.insert(detail.criteria_id)) {
        return Err(SpeakError::Validation(format!(
            "criteria {} is rated more than once",
            detail.criteria_id
        )));
    }

    Ok(())
}

pub fn ensure_known_criteria(request: &SubmitFeedbackRequest, known: &HashSet<i64>) -> SpeakResult<()> {
    match request
        .details
        .iter()
        .find(|detail| !known.contains(&detail.criteria_id))
    {
        Some(detail) => Err(SpeakError::Validation(format!(
            "unknown feedback criteria {}",
            detail.criteria_id
        ))),
        None => Ok(()),
    }
}

/// Feedback is only accepted once the discussion has completed.
pub fn ensure_feedback_open(discussion: &Discussion) -> SpeakResult<()> {
    if discussion.status == DiscussionStatus::Completed {
        Ok(())
    } else {
        Err(SpeakError::FeedbackClosed(discussion.status))
    }
}

pub fn validate_new_category(caller: &User, request: &CreateCategoryRequest) -> SpeakResult<()> {
    if !caller.is_mentor {
        return Err(SpeakError::Authorization(
            "only mentors may define feedback categories".to_string(),
        ));
    }
    if request.name.trim().is_empty() {
        return Err(SpeakError::Validation("category name is required".to_string()));
    }
    if request.criteria.iter().any(|c| c.name.trim().is_empty()) {
        return Err(SpeakError::Validation("criteria name is required".to_string()));
    }
    let too_long = |name: &str| name.chars().count() > MAX_CATALOG_NAME_LEN;
    if too_long(&request.name) || request.criteria.iter().any(|c| too_long(&c.name)) {
        return Err(SpeakError::Validation(format!(
            "category and criteria names must be at most {} characters",
            MAX_CATALOG_NAME_LEN
        )));
    }
    Ok(())
}

/// Feedback is visible only to the two users it involves.
pub fn involves(feedback: &Feedback, user_id: Uuid) -> bool {
    feedback.evaluator_id == user_id || feedback.recipient_id == user_id
}

pub fn feedback_not_found(id: Uuid) -> SpeakError {
    SpeakError::NotFound(format!("Feedback with ID {} not found", id))
}

pub fn most_recent_first(feedback: &mut [Feedback]) {
    feedback.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
