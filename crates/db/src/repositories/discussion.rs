use crate::models::{DbDiscussion, DbDiscussionWithCount};
use chrono::Utc;
use eyre::Result;
use speakspace_core::models::discussion::{DiscussionFilter, DiscussionStatus, NewDiscussion};
use sqlx::PgExecutor;
use uuid::Uuid;

const DISCUSSION_COLUMNS: &str = "id, title, description, discussion_type, created_by, \
    start_time, end_time, max_participants, status, created_at, updated_at";

pub async fn create_discussion(
    executor: impl PgExecutor<'_>,
    creator: Uuid,
    new_discussion: &NewDiscussion,
) -> Result<DbDiscussion> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating discussion: id={}, title={}, creator={}",
        id,
        new_discussion.title,
        creator
    );

    let discussion = sqlx::query_as::<_, DbDiscussion>(&format!(
        r#"
        INSERT INTO discussions (id, title, description, discussion_type, created_by,
                                 start_time, end_time, max_participants, status,
                                 created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING {DISCUSSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&new_discussion.title)
    .bind(&new_discussion.description)
    .bind(new_discussion.discussion_type.as_str())
    .bind(creator)
    .bind(new_discussion.start_time)
    .bind(new_discussion.end_time)
    .bind(new_discussion.max_participants)
    .bind(DiscussionStatus::Pending.as_str())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(discussion)
}

pub async fn get_discussion_by_id(
    executor: impl PgExecutor<'_>,
    id: Uuid,
) -> Result<Option<DbDiscussion>> {
    let discussion = sqlx::query_as::<_, DbDiscussion>(&format!(
        "SELECT {DISCUSSION_COLUMNS} FROM discussions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(discussion)
}

/// Loads the discussion and holds a row lock on it until the surrounding
/// transaction ends.
pub async fn lock_discussion(executor: impl PgExecutor<'_>, id: Uuid) -> Result<Option<DbDiscussion>> {
    let discussion = sqlx::query_as::<_, DbDiscussion>(&format!(
        "SELECT {DISCUSSION_COLUMNS} FROM discussions WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(discussion)
}

pub async fn list_discussions(
    executor: impl PgExecutor<'_>,
    filter: &DiscussionFilter,
) -> Result<Vec<DbDiscussionWithCount>> {
    let discussions = sqlx::query_as::<_, DbDiscussionWithCount>(
        r#"
        SELECT d.id, d.title, d.description, d.discussion_type, d.created_by,
               d.start_time, d.end_time, d.max_participants, d.status,
               d.created_at, d.updated_at,
               COUNT(p.id) FILTER (WHERE p.role = 'participant') AS participants_count
        FROM discussions d
        LEFT JOIN discussion_participants p ON p.discussion_id = d.id
        WHERE ($1::VARCHAR IS NULL OR d.discussion_type = $1)
          AND ($2::VARCHAR IS NULL OR d.status = $2)
        GROUP BY d.id
        ORDER BY d.created_at ASC, d.id ASC
        "#,
    )
    .bind(filter.discussion_type.map(|t| t.as_str()))
    .bind(filter.status.map(|s| s.as_str()))
    .fetch_all(executor)
    .await?;

    Ok(discussions)
}

pub async fn update_status(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    status: DiscussionStatus,
) -> Result<DbDiscussion> {
    let discussion = sqlx::query_as::<_, DbDiscussion>(&format!(
        r#"
        UPDATE discussions
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING {DISCUSSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status.as_str())
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;

    Ok(discussion)
}

/// Roster entries and feedback go with it through `ON DELETE CASCADE`.
pub async fn delete_discussion(executor: impl PgExecutor<'_>, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM discussions WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
