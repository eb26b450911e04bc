pub mod discussion;
pub mod feedback;
pub mod roster;
pub mod token;
pub mod user;

/// True when the report wraps a unique-constraint violation from Postgres.
pub fn is_unique_violation(report: &eyre::Report) -> bool {
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
