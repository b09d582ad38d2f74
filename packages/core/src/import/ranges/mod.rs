//! Range Filters
//!
//! A range is a stateful filter fragment restricting a read or delete to a
//! subset of the target table. Lifecycle: construct, populate once via
//! [`ContentRange::set_data`], apply once via [`ContentRange::apply`] (which
//! mutates the active query builder), then discard. Ranges are not reusable
//! across queries; `apply` is not internally guarded against double
//! application.
//!
//! The active builder is handed to `apply` as an explicit `Option` so the
//! single-owner invariant is visible at the call site: the controller passes
//! `Some(&mut builder)` during one read/delete call, and `None` stands for
//! "no query builder is active" and fails with a variant-specific error.

mod identifier;
mod static_range;
mod value_range;

pub use identifier::IdentifierRange;
pub use static_range::StaticRange;
pub use value_range::ValueRange;

use crate::db::DmlQueryBuilder;
use crate::models::{Row, Value};

use super::error::RangeError;

/// Configuration for populating a range.
#[derive(Debug, Clone, Default)]
pub struct RangeConfig {
    /// Column the range filters on (static and value ranges).
    pub field: Option<String>,
    /// Fixed comparison value (static ranges).
    pub value: Option<Value>,
}

impl RangeConfig {
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            value: None,
        }
    }

    pub fn field_value(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// A filter fragment contributing to a query's restriction clause.
pub trait ContentRange: Send {
    /// Whether the range holds no filter data. Empty ranges are skipped
    /// entirely by the controller; they contribute no clause at all.
    fn is_empty(&self) -> bool;

    /// Populate the range from the dataset and configuration. Fails fast on
    /// missing configuration or an empty resulting filter set, before any
    /// query is built.
    fn set_data(&mut self, rows: &[Row], config: &RangeConfig) -> Result<(), RangeError>;

    /// Contribute this range's predicate fragment to the active builder.
    fn apply(&mut self, builder: Option<&mut DmlQueryBuilder>) -> Result<(), RangeError>;
}
