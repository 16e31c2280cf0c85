//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// A stored row failed domain validation
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

impl DbError {
    /// Whether the error is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(
                    db_err
                        .constraint()
                        .map_or_else(|| db_err.message().to_string(), str::to_string),
                );
            }
        }
        Self::Sqlx(err)
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
