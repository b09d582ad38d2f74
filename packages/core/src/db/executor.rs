//! Query Executor Trait
//!
//! The abstraction point between the import engine and the actual MariaDB
//! connection. Implementations execute one statement at a time and apply
//! their own retry policy for transient conflicts; the engine only ever sees
//! the final outcome.
//!
//! All methods are async because every statement potentially suspends on
//! network I/O to the data store.

use async_trait::async_trait;

use super::QueryError;
use crate::models::{Row, Value};

/// Result of one executed statement.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    /// Result rows, in server order. Empty for DML statements.
    pub rows: Vec<Row>,
    /// Number of rows the statement affected.
    pub affected_rows: u64,
}

impl QueryResult {
    pub fn affected(affected_rows: u64) -> Self {
        Self {
            rows: Vec::new(),
            affected_rows,
        }
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            affected_rows: 0,
        }
    }

    /// Collect one named column across all result rows, stringified.
    /// NULL cells are skipped.
    pub fn column(&self, name: &str) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| match row.get(name) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Integer(i)) => Some(i.to_string()),
                Some(Value::Float(f)) => Some(f.to_string()),
                Some(Value::Boolean(b)) => Some(i64::from(*b).to_string()),
                Some(Value::Null) | None => None,
            })
            .collect()
    }
}

/// Executes statements against the data store.
///
/// Implementations must be `Send + Sync`; the target holds them behind an
/// `Arc` and futures may move between threads.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute one statement. Transient conflicts (deadlock, lock wait
    /// timeout) are retried inside the implementation; an error returned
    /// here is final.
    async fn query(&self, sql: &str) -> Result<QueryResult, QueryError>;

    /// Open a transaction on the underlying connection.
    async fn begin_transaction(&self) -> Result<(), QueryError>;

    /// Commit the open transaction. There is no rollback counterpart: a
    /// failed operation simply never commits.
    async fn commit_transaction(&self) -> Result<(), QueryError>;

    /// Name of the database schema the connection is bound to.
    fn database(&self) -> String;
}
