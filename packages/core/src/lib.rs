//! TableSync Core Reconciliation Engine
//!
//! This crate reconciles an externally supplied dataset against a single
//! MariaDB table: new rows are inserted, changed rows updated and rows no
//! longer present deleted, optionally restricted to a scoped subset of the
//! table.
//!
//! # Architecture
//!
//! - **Three-way diff**: the caller supplies rows categorized as new,
//!   updated or obsolete; new and updated merge into one batched upsert
//!   stream, obsolete rows drive one conditional delete
//! - **One transaction**: upsert and delete succeed or fail together
//! - **Range filters**: composable predicate fragments (identifier, static,
//!   value) narrow reads and deletes to a table subset
//! - **Pluggable execution**: the [`db::QueryExecutor`] trait owns the
//!   connection and the retry policy for transient conflicts
//!
//! # Modules
//!
//! - [`models`] - Shared data structures (Value, Row, DiffPayload, ...)
//! - [`db`] - Query escaping, statement assembly and the executor seam
//! - [`import`] - The reconciliation controller and the range family

pub mod db;
pub mod import;
pub mod models;

// Re-export commonly used types
pub use db::{DmlQueryBuilder, QueryError, QueryEscaper, QueryExecutor, QueryResult};
pub use import::{
    ContentRange, IdentifierRange, MariaDbTarget, RangeConfig, RangeError, StaticRange,
    TargetError, ValueRange,
};
pub use models::{DiffCategory, DiffPayload, Row, UniqueKey, Value};
