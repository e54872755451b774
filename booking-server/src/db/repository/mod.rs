//! Repository Module
//!
//! Free-function repositories over the SQLite pool. Reservation write paths
//! additionally expose `*_conn` variants taking `&mut SqliteConnection` so
//! the reservation engine can run read-sum + write inside one transaction.

pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl RepoError {
    /// SQLite writer contention (SQLITE_BUSY / SQLITE_LOCKED) surfaces as a
    /// generic database error; classify by message so callers can retry.
    pub fn is_busy(&self) -> bool {
        match self {
            RepoError::Database(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("database is locked") || msg.contains("database table is locked")
            }
            _ => false,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
