use crate::models::DbUser;
use chrono::Utc;
use eyre::Result;
use speakspace_core::models::user::{NewUser, RoleFilter, UpdateProfileRequest};
use sqlx::PgExecutor;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, bio, \
    is_mentor, is_participant, discussions_joined, feedback_received, created_at";

pub async fn create_user(executor: impl PgExecutor<'_>, new_user: &NewUser) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, username={}", id, new_user.username);

    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, first_name, last_name,
                           is_mentor, is_participant, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(new_user.is_mentor)
    .bind(new_user.is_participant)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(executor: impl PgExecutor<'_>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_username(
    executor: impl PgExecutor<'_>,
    username: &str,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn username_or_email_taken(
    executor: impl PgExecutor<'_>,
    username: &str,
    email: &str,
) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
    )
    .bind(username)
    .bind(email)
    .fetch_one(executor)
    .await?;

    Ok(taken)
}

pub async fn update_profile(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    update: &UpdateProfileRequest,
) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            bio = COALESCE($4, bio)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.first_name.as_deref())
    .bind(update.last_name.as_deref())
    .bind(update.bio.as_deref())
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn list_users(executor: impl PgExecutor<'_>, role: RoleFilter) -> Result<Vec<DbUser>> {
    let condition = match role {
        RoleFilter::Mentor => "WHERE is_mentor",
        RoleFilter::Participant => "WHERE is_participant",
        RoleFilter::All => "",
    };

    let users = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users {condition} ORDER BY created_at ASC, id ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(users)
}

pub async fn increment_discussions_joined(executor: impl PgExecutor<'_>, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE users SET discussions_joined = discussions_joined + 1 WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn increment_feedback_received(executor: impl PgExecutor<'_>, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE users SET feedback_received = feedback_received + 1 WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}
