use crate::Slot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("slot already reserved: field {} on {} at {}", .0.field, .0.date, .0.time)]
    SlotTaken(Slot),

    #[error("reservation {0} not found")]
    NotFound(i64),

    #[error("failed to read config file {0}")]
    ConfigReadError(String),

    #[error("failed to parse config file {0}")]
    ConfigParseError(String),

    #[error("failed to send notification: {0}")]
    NotifyError(String),

    #[error("database error")]
    DbError(#[from] sqlx::Error),

    #[error("failed to run database migrations")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    /// True when the underlying database rejected a write because of the
    /// unique index over (date, time, field).
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        match err {
            sqlx::Error::Database(e) => e.is_unique_violation(),
            _ => false,
        }
    }
}
