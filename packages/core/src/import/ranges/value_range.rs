//! Value Range
//!
//! Filters one column against the set of values that column takes across
//! the dataset: deduplicated, null-filtered, rendered as a single IN list.

use crate::db::DmlQueryBuilder;
use crate::import::error::{RangeError, RangeKind};
use crate::models::{Row, Value};

use super::{ContentRange, RangeConfig};

/// Range matching one column against a deduplicated value list.
#[derive(Debug, Default)]
pub struct ValueRange {
    field: Option<String>,
    values: Vec<Value>,
}

impl ValueRange {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentRange for ValueRange {
    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set_data(&mut self, rows: &[Row], config: &RangeConfig) -> Result<(), RangeError> {
        let field = config.field.clone().ok_or(RangeError::MissingValueField)?;

        // Booleans are coerced before deduplication so `true` and `1`
        // collapse into one entry; first occurrence wins the position.
        let mut values: Vec<Value> = Vec::new();
        for row in rows {
            let Some(value) = row.get(&field) else {
                continue;
            };
            let value = value.clone().coerce_bool();
            if !values.contains(&value) {
                values.push(value);
            }
        }

        if values.is_empty() {
            return Err(RangeError::EmptyValueRange);
        }

        values.retain(|value| !value.is_null());

        if values.is_empty() {
            return Err(RangeError::OnlyNullValues);
        }

        self.field = Some(field);
        self.values = values;

        Ok(())
    }

    fn apply(&mut self, builder: Option<&mut DmlQueryBuilder>) -> Result<(), RangeError> {
        let builder = builder.ok_or(RangeError::NoActiveBuilder {
            kind: RangeKind::Value,
        })?;

        let Some(field) = &self.field else {
            return Err(RangeError::NotPopulated {
                kind: RangeKind::Value,
            });
        };

        let escaper = builder.escaper();
        let list = escaper.list_value(self.values.iter().map(|value| escaper.escape(value)));
        builder.where_in(&escaper.column(field), &list);

        Ok(())
    }
}
