use axum::http::{StatusCode, header::AUTHORIZATION};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use speakspace_core::models::{
    discussion::{DiscussionDetail, DiscussionStatus, DiscussionSummary},
    roster::{RosterEntry, RosterRole},
    user::User,
};

use crate::test_utils::{TestContext, auth, body_of};

#[test_log::test(tokio::test)]
async fn test_create_discussion_starts_pending_with_creator_as_moderator() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&mentor, 4).await;

    assert_eq!(discussion.status, DiscussionStatus::Pending);
    assert_eq!(discussion.created_by, mentor.user.id);
    assert_eq!(discussion.max_participants, 4);

    let response = ctx
        .server
        .get(&format!("/api/discussions/{}", discussion.id))
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let detail = response.json::<DiscussionDetail>();
    assert_eq!(detail.discussion, discussion);
    assert_eq!(detail.participants_count, 0);
    assert_eq!(detail.participants.len(), 1);
    assert_eq!(detail.participants[0].role, RosterRole::Moderator);
    assert_eq!(detail.participants[0].user_id, mentor.user.id);
}

#[test_log::test(tokio::test)]
async fn test_capacity_defaults_to_five() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let start_time = Utc::now() + Duration::days(2);

    let response = ctx
        .server
        .post("/api/discussions")
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .json(&json!({
            "title": "Debate night",
            "discussion_type": "debate",
            "start_time": start_time,
            "end_time": start_time + Duration::hours(2),
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(body_of(&response.text())["max_participants"], 5);
}

#[rstest]
#[case::end_before_start(json!({
    "title": "Backwards",
    "discussion_type": "interview",
    "start_time": "2030-01-01T12:00:00Z",
    "end_time": "2030-01-01T11:00:00Z",
}))]
#[case::end_equals_start(json!({
    "title": "Instant",
    "discussion_type": "interview",
    "start_time": "2030-01-01T12:00:00Z",
    "end_time": "2030-01-01T12:00:00Z",
}))]
#[case::blank_title(json!({
    "title": "   ",
    "discussion_type": "presentation",
    "start_time": "2030-01-01T12:00:00Z",
    "end_time": "2030-01-01T13:00:00Z",
}))]
#[case::zero_capacity(json!({
    "title": "Nobody",
    "discussion_type": "group_discussion",
    "start_time": "2030-01-01T12:00:00Z",
    "end_time": "2030-01-01T13:00:00Z",
    "max_participants": 0,
}))]
#[case::unknown_type(json!({
    "title": "Quiz",
    "discussion_type": "quiz",
    "start_time": "2030-01-01T12:00:00Z",
    "end_time": "2030-01-01T13:00:00Z",
}))]
#[tokio::test]
async fn test_create_discussion_rejects_invalid_input(#[case] payload: serde_json::Value) {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;

    let response = ctx
        .server
        .post("/api/discussions")
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .json(&payload)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(&response.text())["error"], "validation_error");
}

#[test_log::test(tokio::test)]
async fn test_third_participant_is_turned_away_at_capacity_two() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&mentor, 2).await;

    let a = ctx.signup(false).await;
    let b = ctx.signup(false).await;
    let c = ctx.signup(false).await;

    let (status, entry) = ctx.join(&a, discussion.id, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["role"], "participant");

    let (status, _) = ctx.join(&b, discussion.id, Some("participant")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx.join(&c, discussion.id, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "discussion_full");

    let response = ctx
        .server
        .get(&format!("/api/discussions/{}/participants?role=participant", discussion.id))
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .await;
    let participants = response.json::<Vec<RosterEntry>>();
    assert_eq!(participants.len(), 2);
    assert!(participants.iter().all(|entry| entry.user_id != c.user.id));
}

#[test_log::test(tokio::test)]
async fn test_joining_twice_is_rejected() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&mentor, 5).await;
    let member = ctx.signup(false).await;

    let (first, _) = ctx.join(&member, discussion.id, None).await;
    let (second, body) = ctx.join(&member, discussion.id, None).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "already_member");

    let response = ctx
        .server
        .get("/api/users/me")
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;
    assert_eq!(response.json::<User>().discussions_joined, 1);
}

#[test_log::test(tokio::test)]
async fn test_evaluator_role_is_reserved_for_mentors() {
    let ctx = TestContext::new();
    let creator = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&creator, 1).await;

    let participant = ctx.signup(false).await;
    let (status, body) = ctx.join(&participant, discussion.id, Some("evaluator")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let mentor = ctx.signup(true).await;
    let (status, entry) = ctx.join(&mentor, discussion.id, Some("evaluator")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["role"], "evaluator");

    let (status, body) = ctx.join(&participant, discussion.id, Some("moderator")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = ctx.join(&participant, discussion.id, Some("spectator")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[test_log::test(tokio::test)]
async fn test_leave_then_rejoin() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&mentor, 1).await;
    let member = ctx.signup(false).await;
    let leave_path = format!("/api/discussions/{}/leave", discussion.id);

    let response = ctx
        .server
        .post(&leave_path)
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(&response.text())["error"], "not_member");

    let (status, _) = ctx.join(&member, discussion.id, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = ctx
        .server
        .post(&leave_path)
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // The freed seat is available again.
    let (status, _) = ctx.join(&member, discussion.id, None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn test_status_only_moves_forward_and_only_for_creator() {
    let ctx = TestContext::new();
    let creator = ctx.signup(true).await;
    let other = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&creator, 3).await;

    let (status, body) = ctx.transition(&creator, discussion.id, "completed").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");

    let (status, body) = ctx.transition(&other, discussion.id, "active").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = ctx.transition(&creator, discussion.id, "active").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");

    let (status, body) = ctx.transition(&creator, discussion.id, "pending").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");

    let (status, body) = ctx.transition(&creator, discussion.id, "completed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
}

#[test_log::test(tokio::test)]
async fn test_roster_is_frozen_once_active() {
    let ctx = TestContext::new();
    let creator = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&creator, 3).await;
    let early = ctx.signup(false).await;
    let late = ctx.signup(false).await;

    ctx.join(&early, discussion.id, None).await;
    ctx.transition(&creator, discussion.id, "active").await;

    let (status, body) = ctx.join(&late, discussion.id, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_joinable");

    let response = ctx
        .server
        .post(&format!("/api/discussions/{}/leave", discussion.id))
        .add_header(AUTHORIZATION, auth(&early.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(&response.text())["error"], "not_leavable");
}

#[test_log::test(tokio::test)]
async fn test_list_discussions_filters_by_status() {
    let ctx = TestContext::new();
    let creator = ctx.signup(true).await;
    let pending = ctx.create_discussion(&creator, 3).await;
    let active = ctx.create_discussion(&creator, 3).await;
    ctx.transition(&creator, active.id, "active").await;

    let member = ctx.signup(false).await;
    ctx.join(&member, pending.id, None).await;

    let all = ctx
        .server
        .get("/api/discussions")
        .add_header(AUTHORIZATION, auth(&member.token))
        .await
        .json::<Vec<DiscussionSummary>>();
    assert_eq!(all.len(), 2);

    let only_pending = ctx
        .server
        .get("/api/discussions?status=pending&type=interview")
        .add_header(AUTHORIZATION, auth(&member.token))
        .await
        .json::<Vec<DiscussionSummary>>();
    assert_eq!(only_pending.len(), 1);
    assert_eq!(only_pending[0].discussion.id, pending.id);
    assert_eq!(only_pending[0].participants_count, 1);

    let debates = ctx
        .server
        .get("/api/discussions?type=debate")
        .add_header(AUTHORIZATION, auth(&member.token))
        .await
        .json::<Vec<DiscussionSummary>>();
    assert!(debates.is_empty());

    let response = ctx
        .server
        .get("/api/discussions?status=archived")
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[test_log::test(tokio::test)]
async fn test_delete_is_creator_only() {
    let ctx = TestContext::new();
    let creator = ctx.signup(true).await;
    let other = ctx.signup(false).await;
    let discussion = ctx.create_discussion(&creator, 3).await;
    let path = format!("/api/discussions/{}", discussion.id);

    let response = ctx
        .server
        .delete(&path)
        .add_header(AUTHORIZATION, auth(&other.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .delete(&path)
        .add_header(AUTHORIZATION, auth(&creator.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = ctx
        .server
        .get(&path)
        .add_header(AUTHORIZATION, auth(&creator.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn test_unknown_discussion_is_not_found() {
    let ctx = TestContext::new();
    let member = ctx.signup(false).await;
    let missing = uuid::Uuid::new_v4();

    let (status, body) = ctx.join(&member, missing, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let response = ctx
        .server
        .get(&format!("/api/discussions/{missing}/participants"))
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::discussion("/api/discussions/not-a-uuid")]
#[case::participants("/api/discussions/42/participants")]
#[case::user("/api/users/not-a-uuid")]
#[tokio::test]
async fn test_malformed_id_is_not_found(#[case] path: &str) {
    let ctx = TestContext::new();
    let member = ctx.signup(false).await;

    let response = ctx
        .server
        .get(path)
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = body_of(&response.text());
    assert_eq!(body["error"], "not_found");
    assert!(body["detail"].is_string());
}

#[test_log::test(tokio::test)]
async fn test_creator_cannot_leave_as_moderator() {
    let ctx = TestContext::new();
    let creator = ctx.signup(true).await;
    let discussion = ctx.create_discussion(&creator, 1).await;

    let response = ctx
        .server
        .post(&format!("/api/discussions/{}/leave", discussion.id))
        .add_header(AUTHORIZATION, auth(&creator.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(body_of(&response.text())["error"], "validation_error");

    let moderators = ctx
        .server
        .get(&format!("/api/discussions/{}/participants?role=moderator", discussion.id))
        .add_header(AUTHORIZATION, auth(&creator.token))
        .await
        .json::<Vec<RosterEntry>>();
    assert_eq!(moderators.len(), 1);
    assert_eq!(moderators[0].user_id, creator.user.id);
}
