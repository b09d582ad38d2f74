//! Import Errors
//!
//! Error taxonomy of the reconciliation engine. Configuration and
//! structural violations are detected before any statement is issued;
//! query errors are wrapped from the execution layer and abort the
//! surrounding transaction (which is then never committed).

use std::fmt;

use thiserror::Error;

use crate::db::QueryError;

/// Errors raised by the import target controller.
#[derive(Error, Debug)]
pub enum TargetError {
    /// An operation ran before `set_target` bound a table.
    #[error("no table defined to import to")]
    NoTable,

    /// Rows within one upsert batch disagree on their column set. Every
    /// mismatching row has been logged before this is raised; no statement
    /// was issued.
    #[error("items do not have uniform structure")]
    NonUniformStructure,

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Range variant names as they appear in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Identifier,
    Static,
    Value,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RangeKind::Identifier => "identifier",
            RangeKind::Static => "static",
            RangeKind::Value => "value",
        };
        f.write_str(name)
    }
}

/// Errors raised by the range family, at `set_data` or `apply` time.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("identifier range can't be empty")]
    EmptyIdentifierRange,

    #[error("value range can't be empty")]
    EmptyValueRange,

    #[error("only NULL values in value range")]
    OnlyNullValues,

    #[error("value range requires a field value")]
    MissingValueField,

    #[error("static range requires a field value")]
    MissingStaticField,

    #[error("static range requires a column value")]
    MissingStaticValue,

    /// `apply` was called without an active query builder handle.
    #[error("tried to apply {kind} range, but no query builder is active")]
    NoActiveBuilder { kind: RangeKind },

    /// `apply` was called before `set_data` populated the range.
    #[error("tried to apply {kind} range before it was populated")]
    NotPopulated { kind: RangeKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_active_builder_message_names_the_variant() {
        let err = RangeError::NoActiveBuilder {
            kind: RangeKind::Identifier,
        };

        assert_eq!(
            err.to_string(),
            "tried to apply identifier range, but no query builder is active"
        );
    }

    #[test]
    fn test_query_errors_wrap_transparently() {
        let err = TargetError::from(QueryError::execution("boom"));

        assert_eq!(err.to_string(), "database query error: boom");
    }
}
