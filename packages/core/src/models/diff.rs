//! Dataset Diff Payload
//!
//! An externally computed three-way diff against the target table. `New` and
//! `Updated` rows are merged into one upsert stream by the import target;
//! `Obsolete` rows drive the conditional delete.

use serde::{Deserialize, Serialize};

use super::Row;

/// Category of a row inside a diff payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffCategory {
    New,
    Updated,
    Obsolete,
}

/// Categorized row sets forming one reconciliation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffPayload {
    #[serde(default)]
    pub new: Vec<Row>,
    #[serde(default)]
    pub updated: Vec<Row>,
    #[serde(default)]
    pub obsolete: Vec<Row>,
}

impl DiffPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, category: DiffCategory) -> &[Row] {
        match category {
            DiffCategory::New => &self.new,
            DiffCategory::Updated => &self.updated,
            DiffCategory::Obsolete => &self.obsolete,
        }
    }

    /// Drain one category out of the payload.
    pub fn take(&mut self, category: DiffCategory) -> Vec<Row> {
        match category {
            DiffCategory::New => std::mem::take(&mut self.new),
            DiffCategory::Updated => std::mem::take(&mut self.updated),
            DiffCategory::Obsolete => std::mem::take(&mut self.obsolete),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.obsolete.is_empty()
    }
}
