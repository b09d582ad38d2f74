//! Database Layer
//!
//! MariaDB query plumbing for the import target:
//!
//! - [`QueryExecutor`] - async seam to the actual connection; implementations
//!   own the retry policy for transient conflicts (deadlock, lock timeout)
//! - [`QueryEscaper`] - identifier and literal escaping, including the
//!   runtime-kind dispatch for row values and WKT geometry handling
//! - [`DmlQueryBuilder`] - mutable SELECT/INSERT/DELETE statement assembly
//!   with grouped WHERE clauses and AND/OR connectives
//!
//! The engine itself never retries: by the time a [`QueryExecutor`] call
//! returns, the statement either ultimately succeeded or ultimately failed.

mod builder;
mod error;
mod escaper;
mod executor;

pub use builder::DmlQueryBuilder;
pub use error::QueryError;
pub use escaper::QueryEscaper;
pub use executor::{QueryExecutor, QueryResult};
