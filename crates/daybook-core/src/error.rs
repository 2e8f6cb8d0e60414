use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid day code: {0}")]
    InvalidDay(String),

    #[error("Todo {0} has a pending change; wait for it to settle")]
    Busy(Uuid),

    #[error("Another todo is still being added")]
    AddInFlight,

    #[error("Duplicate submission ignored: '{0}'")]
    DuplicateSubmission(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, text)

    #[error("Store error: {0}")]
    Store(String),
}
