use crate::models::DbRosterEntry;
use eyre::Result;
use speakspace_core::models::roster::RosterEntry;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn insert_entry(executor: impl PgExecutor<'_>, entry: &RosterEntry) -> Result<DbRosterEntry> {
    let row = sqlx::query_as::<_, DbRosterEntry>(
        r#"
        INSERT INTO discussion_participants (id, discussion_id, user_id, role, joined_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, discussion_id, user_id, role, joined_at
        "#,
    )
    .bind(entry.id)
    .bind(entry.discussion_id)
    .bind(entry.user_id)
    .bind(entry.role.as_str())
    .bind(entry.joined_at)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

pub async fn get_entries_by_discussion_id(
    executor: impl PgExecutor<'_>,
    discussion_id: Uuid,
) -> Result<Vec<DbRosterEntry>> {
    let entries = sqlx::query_as::<_, DbRosterEntry>(
        r#"
        SELECT id, discussion_id, user_id, role, joined_at
        FROM discussion_participants
        WHERE discussion_id = $1
        ORDER BY joined_at ASC, id ASC
        "#,
    )
    .bind(discussion_id)
    .fetch_all(executor)
    .await?;

    Ok(entries)
}

pub async fn delete_entry(executor: impl PgExecutor<'_>, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM discussion_participants WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
