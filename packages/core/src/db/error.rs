//! Query Execution Errors
//!
//! Failures reported by the execution collaborator. Transient conflicts are
//! distinguished so executor implementations can retry them; the import
//! engine treats every error reaching it as fatal.

use thiserror::Error;

/// Errors reported by a [`QueryExecutor`](super::QueryExecutor).
#[derive(Error, Debug)]
pub enum QueryError {
    /// The statement lost a deadlock race.
    #[error("database query deadlock: {0}")]
    Deadlock(String),

    /// The statement timed out waiting for a row lock.
    #[error("database lock wait timeout: {0}")]
    LockTimeout(String),

    /// The statement failed for a non-transient reason.
    #[error("database query error: {0}")]
    Execution(String),

    /// The connection itself failed.
    #[error("database connection error: {0}")]
    Connection(String),
}

impl QueryError {
    /// Whether an executor's retry policy may re-issue the statement.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Deadlock(_) | Self::LockTimeout(_))
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}
