use chrono::Utc;
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn insert_token(executor: impl PgExecutor<'_>, user_id: Uuid, key: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO auth_tokens (key, user_id, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(key)
    .bind(user_id)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn get_token_owner(executor: impl PgExecutor<'_>, key: &str) -> Result<Option<Uuid>> {
    let user_id = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM auth_tokens WHERE key = $1")
        .bind(key)
        .fetch_optional(executor)
        .await?;

    Ok(user_id)
}

pub async fn delete_token(executor: impl PgExecutor<'_>, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM auth_tokens WHERE key = $1")
        .bind(key)
        .execute(executor)
        .await?;

    Ok(())
}
