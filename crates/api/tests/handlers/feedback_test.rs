use axum::http::{StatusCode, header::AUTHORIZATION};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use speakspace_core::models::{
    feedback::{Feedback, FeedbackCategory},
    user::User,
};
use uuid::Uuid;

use crate::test_utils::{TestContext, TestUser, auth, body_of};

/// A completed discussion with one mentor-creator and one participant.
async fn completed_session(ctx: &TestContext) -> (TestUser, TestUser, Uuid) {
    let mentor = ctx.signup(true).await;
    let participant = ctx.signup(false).await;
    let discussion = ctx.create_discussion(&mentor, 3).await;

    let (status, _) = ctx.join(&participant, discussion.id, None).await;
    assert_eq!(status, StatusCode::CREATED);
    ctx.complete(&mentor, discussion.id).await;

    (mentor, participant, discussion.id)
}

async fn submit(ctx: &TestContext, evaluator: &TestUser, payload: Value) -> (StatusCode, Value) {
    let response = ctx
        .server
        .post("/api/feedback")
        .add_header(AUTHORIZATION, auth(&evaluator.token))
        .json(&payload)
        .await;

    (response.status_code(), body_of(&response.text()))
}

#[test_log::test(tokio::test)]
async fn test_catalog_is_seeded() {
    let ctx = TestContext::new();
    let member = ctx.signup(false).await;

    let response = ctx
        .server
        .get("/api/feedback/categories")
        .add_header(AUTHORIZATION, auth(&member.token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let categories = response.json::<Vec<FeedbackCategory>>();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Communication", "Content", "Critical Thinking"]);
    assert!(categories.iter().all(|c| c.criteria.len() == 2));
    assert_eq!(categories[0].criteria[0].name, "Clarity");
}

#[test_log::test(tokio::test)]
async fn test_only_mentors_define_categories() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let participant = ctx.signup(false).await;
    let payload = json!({
        "name": "Delivery",
        "description": "Voice, pace and presence",
        "criteria": [{ "name": "Pacing", "description": "Speaks at an even pace" }],
    });

    let response = ctx
        .server
        .post("/api/feedback/categories")
        .add_header(AUTHORIZATION, auth(&participant.token))
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .post("/api/feedback/categories")
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let category = response.json::<FeedbackCategory>();
    assert_eq!(category.name, "Delivery");
    assert_eq!(category.criteria.len(), 1);
    assert_eq!(category.criteria[0].category_id, category.id);

    let response = ctx
        .server
        .post("/api/feedback/categories")
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(body_of(&response.text())["error"], "duplicate_category");
}

#[test_log::test(tokio::test)]
async fn test_feedback_waits_for_completion() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let participant = ctx.signup(false).await;
    let discussion = ctx.create_discussion(&mentor, 3).await;
    ctx.join(&participant, discussion.id, None).await;

    let payload = json!({
        "discussion_id": discussion.id,
        "recipient_id": participant.user.id,
        "details": [{ "criteria_id": 1, "rating": 4 }],
    });

    let (status, body) = submit(&ctx, &mentor, payload.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "feedback_closed");

    ctx.complete(&mentor, discussion.id).await;
    let (status, _) = submit(&ctx, &mentor, payload).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[test_log::test(tokio::test)]
async fn test_submitted_feedback_is_recorded_once() {
    let ctx = TestContext::new();
    let (mentor, participant, discussion_id) = completed_session(&ctx).await;

    let (status, body) = submit(
        &ctx,
        &mentor,
        json!({
            "discussion_id": discussion_id,
            "recipient_id": participant.user.id,
            "details": [{ "criteria_id": 1, "rating": 5, "comment": "clear" }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let feedback: Feedback = serde_json::from_value(body).unwrap();
    assert_eq!(feedback.evaluator_id, mentor.user.id);
    assert_eq!(feedback.recipient_id, participant.user.id);
    assert_eq!(feedback.details.len(), 1);
    assert_eq!(feedback.details[0].criteria_id, 1);
    assert_eq!(feedback.details[0].rating, 5);
    assert_eq!(feedback.details[0].comment, "clear");

    let me = ctx
        .server
        .get("/api/users/me")
        .add_header(AUTHORIZATION, auth(&participant.token))
        .await
        .json::<User>();
    assert_eq!(me.feedback_received, 1);

    let received = ctx
        .server
        .get("/api/feedback/received")
        .add_header(AUTHORIZATION, auth(&participant.token))
        .await
        .json::<Vec<Feedback>>();
    assert_eq!(received, vec![feedback.clone()]);

    let given = ctx
        .server
        .get("/api/feedback/given")
        .add_header(AUTHORIZATION, auth(&mentor.token))
        .await
        .json::<Vec<Feedback>>();
    assert_eq!(given, vec![feedback]);

    let nothing_given = ctx
        .server
        .get("/api/feedback/given")
        .add_header(AUTHORIZATION, auth(&participant.token))
        .await
        .json::<Vec<Feedback>>();
    assert!(nothing_given.is_empty());
}

#[rstest]
#[case::rating_above_range(json!([{ "criteria_id": 1, "rating": 6 }]), "invalid_rating")]
#[case::rating_below_range(json!([{ "criteria_id": 1, "rating": 0 }]), "invalid_rating")]
#[case::rating_beyond_32_bits(json!([{ "criteria_id": 1, "rating": 3_000_000_000_i64 }]), "invalid_rating")]
#[case::no_details(json!([]), "validation_error")]
#[case::unknown_criteria(json!([{ "criteria_id": 4242, "rating": 3 }]), "validation_error")]
#[case::criteria_rated_twice(
    json!([{ "criteria_id": 2, "rating": 3 }, { "criteria_id": 2, "rating": 4 }]),
    "validation_error"
)]
#[tokio::test]
async fn test_invalid_feedback_is_rejected(#[case] details: Value, #[case] kind: &str) {
    let ctx = TestContext::new();
    let (mentor, participant, discussion_id) = completed_session(&ctx).await;

    let (status, body) = submit(
        &ctx,
        &mentor,
        json!({
            "discussion_id": discussion_id,
            "recipient_id": participant.user.id,
            "details": details,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], kind);

    let me = ctx
        .server
        .get("/api/users/me")
        .add_header(AUTHORIZATION, auth(&participant.token))
        .await
        .json::<User>();
    assert_eq!(me.feedback_received, 0);
}

#[test_log::test(tokio::test)]
async fn test_self_feedback_is_rejected() {
    let ctx = TestContext::new();
    let (mentor, _, discussion_id) = completed_session(&ctx).await;

    let (status, body) = submit(
        &ctx,
        &mentor,
        json!({
            "discussion_id": discussion_id,
            "recipient_id": mentor.user.id,
            "details": [{ "criteria_id": 1, "rating": 3 }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "self_feedback");
}

#[test_log::test(tokio::test)]
async fn test_feedback_for_unknown_discussion_is_not_found() {
    let ctx = TestContext::new();
    let mentor = ctx.signup(true).await;
    let participant = ctx.signup(false).await;

    let (status, body) = submit(
        &ctx,
        &mentor,
        json!({
            "discussion_id": Uuid::new_v4(),
            "recipient_id": participant.user.id,
            "details": [{ "criteria_id": 1, "rating": 3 }],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[test_log::test(tokio::test)]
async fn test_feedback_is_visible_only_to_its_parties() {
    let ctx = TestContext::new();
    let (mentor, participant, discussion_id) = completed_session(&ctx).await;
    let stranger = ctx.signup(false).await;

    let (status, body) = submit(
        &ctx,
        &mentor,
        json!({
            "discussion_id": discussion_id,
            "recipient_id": participant.user.id,
            "details": [{ "criteria_id": 3, "rating": 4 }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let feedback: Feedback = serde_json::from_value(body).unwrap();
    let path = format!("/api/feedback/{}", feedback.id);

    for party in [&mentor, &participant] {
        let response = ctx
            .server
            .get(&path)
            .add_header(AUTHORIZATION, auth(&party.token))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Feedback>(), feedback);

        let all = ctx
            .server
            .get("/api/feedback")
            .add_header(AUTHORIZATION, auth(&party.token))
            .await
            .json::<Vec<Feedback>>();
        assert_eq!(all, vec![feedback.clone()]);
    }

    let response = ctx
        .server
        .get(&path)
        .add_header(AUTHORIZATION, auth(&stranger.token))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(body_of(&response.text())["error"], "not_found");

    let nothing = ctx
        .server
        .get("/api/feedback")
        .add_header(AUTHORIZATION, auth(&stranger.token))
        .await
        .json::<Vec<Feedback>>();
    assert!(nothing.is_empty());
}
