//! Shared test support: a scripted query executor.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tablesync_core::db::{QueryError, QueryExecutor, QueryResult};
use tablesync_core::models::Row;

/// Scripted executor: records every statement and transaction call, and
/// answers queries from a queue of prepared outcomes. Unexpected queries
/// fail loudly so tests stay strict about what gets issued.
#[derive(Default)]
pub struct MockExecutor {
    outcomes: Mutex<VecDeque<Result<QueryResult, QueryError>>>,
    log: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_result(self, result: QueryResult) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(result));
        self
    }

    pub fn expect_rows(self, rows: Vec<Row>) -> Self {
        self.expect_result(QueryResult::with_rows(rows))
    }

    pub fn expect_affected(self, affected_rows: u64) -> Self {
        self.expect_result(QueryResult::affected(affected_rows))
    }

    pub fn expect_error(self, error: QueryError) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    /// Everything issued so far: SQL statements plus BEGIN/COMMIT markers,
    /// in order.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn query(&self, sql: &str) -> Result<QueryResult, QueryError> {
        self.log.lock().unwrap().push(sql.to_string());

        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Err(QueryError::execution(format!("unexpected query: {sql}"))),
        }
    }

    async fn begin_transaction(&self) -> Result<(), QueryError> {
        self.log.lock().unwrap().push("BEGIN".to_string());
        Ok(())
    }

    async fn commit_transaction(&self) -> Result<(), QueryError> {
        self.log.lock().unwrap().push("COMMIT".to_string());
        Ok(())
    }

    fn database(&self) -> String {
        "database".to_string()
    }
}

/// Parse a row from a JSON object literal, preserving column order.
#[allow(dead_code)]
pub fn row(json: &str) -> Row {
    serde_json::from_str(json).expect("invalid test row")
}
