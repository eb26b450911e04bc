use eyre::Result;
use speakspace_core::models::feedback::default_catalog;
use sqlx::{Pool, Postgres};
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(150) NOT NULL UNIQUE,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        first_name VARCHAR(150) NOT NULL DEFAULT '',
        last_name VARCHAR(150) NOT NULL DEFAULT '',
        bio TEXT NOT NULL DEFAULT '',
        is_mentor BOOLEAN NOT NULL DEFAULT FALSE,
        is_participant BOOLEAN NOT NULL DEFAULT TRUE,
        discussions_joined BIGINT NOT NULL DEFAULT 0 CHECK (discussions_joined >= 0),
        feedback_received BIGINT NOT NULL DEFAULT 0 CHECK (feedback_received >= 0),
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS auth_tokens (
        key VARCHAR(64) PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS discussions (
        id UUID PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        discussion_type VARCHAR(20) NOT NULL
            CHECK (discussion_type IN ('interview', 'group_discussion', 'debate', 'presentation')),
        created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        start_time TIMESTAMP WITH TIME ZONE NOT NULL,
        end_time TIMESTAMP WITH TIME ZONE NOT NULL,
        max_participants INTEGER NOT NULL DEFAULT 5 CHECK (max_participants >= 1),
        status VARCHAR(20) NOT NULL DEFAULT 'pending'
            CHECK (status IN ('pending', 'active', 'completed')),
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT valid_time_range CHECK (end_time > start_time)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS discussion_participants (
        id UUID PRIMARY KEY,
        discussion_id UUID NOT NULL REFERENCES discussions(id) ON DELETE CASCADE,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        role VARCHAR(20) NOT NULL DEFAULT 'participant'
            CHECK (role IN ('participant', 'moderator', 'evaluator')),
        joined_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT discussion_participants_unique UNIQUE (discussion_id, user_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedback_categories (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL UNIQUE,
        description TEXT NOT NULL DEFAULT ''
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedback_criteria (
        id BIGSERIAL PRIMARY KEY,
        category_id BIGINT NOT NULL REFERENCES feedback_categories(id) ON DELETE CASCADE,
        name VARCHAR(100) NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedback (
        id UUID PRIMARY KEY,
        discussion_id UUID NOT NULL REFERENCES discussions(id) ON DELETE CASCADE,
        evaluator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        recipient_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
        CONSTRAINT no_self_feedback CHECK (evaluator_id <> recipient_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedback_details (
        id UUID PRIMARY KEY,
        feedback_id UUID NOT NULL REFERENCES feedback(id) ON DELETE CASCADE,
        criteria_id BIGINT NOT NULL REFERENCES feedback_criteria(id),
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comment TEXT NOT NULL DEFAULT '',
        CONSTRAINT feedback_details_unique UNIQUE (feedback_id, criteria_id)
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_discussions_created_at ON discussions(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_discussions_status ON discussions(status)",
    "CREATE INDEX IF NOT EXISTS idx_participants_discussion_id ON discussion_participants(discussion_id)",
    "CREATE INDEX IF NOT EXISTS idx_participants_user_id ON discussion_participants(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_evaluator_id ON feedback(evaluator_id)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_recipient_id ON feedback(recipient_id)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_details_feedback_id ON feedback_details(feedback_id)",
    "CREATE INDEX IF NOT EXISTS idx_auth_tokens_user_id ON auth_tokens(user_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    for statement in STATEMENTS {
        sqlx::query(*statement).execute(pool).await?;
    }

    seed_feedback_catalog(pool).await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

/// Inserts the default feedback categories that are not present yet.
async fn seed_feedback_catalog(pool: &Pool<Postgres>) -> Result<()> {
    let mut tx = pool.begin().await?;

    for category in default_catalog() {
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO feedback_categories (name, description)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(category_id) = inserted else {
            continue;
        };

        for criteria in &category.criteria {
            sqlx::query(
                r#"
                INSERT INTO feedback_criteria (category_id, name, description)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(category_id)
            .bind(&criteria.name)
            .bind(&criteria.description)
            .execute(&mut *tx)
            .await?;
        }
        info!("Seeded feedback category {}", category.name);
    }

    tx.commit().await?;
    Ok(())
}
