//! Schema Descriptors
//!
//! Metadata discovered from the target table's schema catalogs.

use serde::{Deserialize, Serialize};

/// A non-primary unique constraint: name plus ordered key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    pub name: String,
    pub columns: Vec<String>,
}

impl UniqueKey {
    /// Build a descriptor from the `GROUP_CONCAT` form the information
    /// schema query returns (comma-joined column names, in key order).
    pub fn from_grouped(name: &str, columns: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: columns
                .split(',')
                .map(|column| column.trim().to_string())
                .filter(|column| !column.is_empty())
                .collect(),
        }
    }
}
