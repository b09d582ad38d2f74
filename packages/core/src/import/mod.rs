//! Import Target Layer
//!
//! The reconciliation engine: applies a categorized dataset diff against a
//! single MariaDB table inside one transaction, batching the upsert stream
//! and scoping the delete with composable range filters.
//!
//! - [`MariaDbTarget`] - the controller owning the table binding, batch
//!   size, cached identifier keys and all read/write operations
//! - [`ContentRange`] - the filter-fragment family restricting reads and
//!   deletes to a subset of the table

pub mod error;
pub mod ranges;
mod target;

pub use error::{RangeError, RangeKind, TargetError};
pub use ranges::{ContentRange, IdentifierRange, RangeConfig, StaticRange, ValueRange};
pub use target::{MariaDbTarget, DEFAULT_BATCH_SIZE};
