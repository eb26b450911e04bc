use crate::models::{DbFeedback, DbFeedbackCategory, DbFeedbackCriteria, DbFeedbackDetail};
use eyre::Result;
use speakspace_core::models::feedback::{Feedback, FeedbackDetail, NewCriteria};
use sqlx::PgExecutor;
use uuid::Uuid;

// Catalog

pub async fn get_categories(executor: impl PgExecutor<'_>) -> Result<Vec<DbFeedbackCategory>> {
    let categories = sqlx::query_as::<_, DbFeedbackCategory>(
        "SELECT id, name, description FROM feedback_categories ORDER BY id ASC",
    )
    .fetch_all(executor)
    .await?;

    Ok(categories)
}

pub async fn get_criteria(executor: impl PgExecutor<'_>) -> Result<Vec<DbFeedbackCriteria>> {
    let criteria = sqlx::query_as::<_, DbFeedbackCriteria>(
        "SELECT id, category_id, name, description FROM feedback_criteria ORDER BY id ASC",
    )
    .fetch_all(executor)
    .await?;

    Ok(criteria)
}

pub async fn get_criteria_ids(executor: impl PgExecutor<'_>, ids: &[i64]) -> Result<Vec<i64>> {
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM feedback_criteria WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(executor)
        .await?;

    Ok(found)
}

pub async fn category_name_taken(executor: impl PgExecutor<'_>, name: &str) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM feedback_categories WHERE name = $1)",
    )
    .bind(name)
    .fetch_one(executor)
    .await?;

    Ok(taken)
}

pub async fn insert_category(
    executor: impl PgExecutor<'_>,
    name: &str,
    description: &str,
) -> Result<DbFeedbackCategory> {
    let category = sqlx::query_as::<_, DbFeedbackCategory>(
        r#"
        INSERT INTO feedback_categories (name, description)
        VALUES ($1, $2)
        RETURNING id, name, description
        "#,
    )
    .bind(name)
    .bind(description)
    .fetch_one(executor)
    .await?;

    Ok(category)
}

pub async fn insert_criteria(
    executor: impl PgExecutor<'_>,
    category_id: i64,
    criteria: &NewCriteria,
) -> Result<DbFeedbackCriteria> {
    let row = sqlx::query_as::<_, DbFeedbackCriteria>(
        r#"
        INSERT INTO feedback_criteria (category_id, name, description)
        VALUES ($1, $2, $3)
        RETURNING id, category_id, name, description
        "#,
    )
    .bind(category_id)
    .bind(&criteria.name)
    .bind(&criteria.description)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

// Feedback

pub async fn insert_feedback(executor: impl PgExecutor<'_>, feedback: &Feedback) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO feedback (id, discussion_id, evaluator_id, recipient_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(feedback.id)
    .bind(feedback.discussion_id)
    .bind(feedback.evaluator_id)
    .bind(feedback.recipient_id)
    .bind(feedback.created_at)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn insert_detail(
    executor: impl PgExecutor<'_>,
    feedback_id: Uuid,
    detail: &FeedbackDetail,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO feedback_details (id, feedback_id, criteria_id, rating, comment)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(detail.id)
    .bind(feedback_id)
    .bind(detail.criteria_id)
    .bind(i32::try_from(detail.rating)?)
    .bind(&detail.comment)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_feedback_by_id(executor: impl PgExecutor<'_>, id: Uuid) -> Result<Option<DbFeedback>> {
    let feedback = sqlx::query_as::<_, DbFeedback>(
        r#"
        SELECT id, discussion_id, evaluator_id, recipient_id, created_at
        FROM feedback
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(feedback)
}

pub async fn get_feedback_by_evaluator(
    executor: impl PgExecutor<'_>,
    evaluator_id: Uuid,
) -> Result<Vec<DbFeedback>> {
    let feedback = sqlx::query_as::<_, DbFeedback>(
        r#"
        SELECT id, discussion_id, evaluator_id, recipient_id, created_at
        FROM feedback
        WHERE evaluator_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(evaluator_id)
    .fetch_all(executor)
    .await?;

    Ok(feedback)
}

pub async fn get_feedback_by_recipient(
    executor: impl PgExecutor<'_>,
    recipient_id: Uuid,
) -> Result<Vec<DbFeedback>> {
    let feedback = sqlx::query_as::<_, DbFeedback>(
        r#"
        SELECT id, discussion_id, evaluator_id, recipient_id, created_at
        FROM feedback
        WHERE recipient_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(recipient_id)
    .fetch_all(executor)
    .await?;

    Ok(feedback)
}

pub async fn get_details_for_feedback(
    executor: impl PgExecutor<'_>,
    feedback_ids: &[Uuid],
) -> Result<Vec<DbFeedbackDetail>> {
    let details = sqlx::query_as::<_, DbFeedbackDetail>(
        r#"
        SELECT id, feedback_id, criteria_id, rating, comment
        FROM feedback_details
        WHERE feedback_id = ANY($1)
        ORDER BY criteria_id ASC
        "#,
    )
    .bind(feedback_ids)
    .fetch_all(executor)
    .await?;

    Ok(details)
}
