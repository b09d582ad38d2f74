//! Static Range
//!
//! A single fixed `field = value` predicate, configured rather than derived
//! from the dataset. Never empty once populated.

use crate::db::DmlQueryBuilder;
use crate::import::error::{RangeError, RangeKind};
use crate::models::{Row, Value};

use super::{ContentRange, RangeConfig};

/// Range pinning one column to a configured value.
#[derive(Debug, Default)]
pub struct StaticRange {
    field: Option<String>,
    value: Option<Value>,
}

impl StaticRange {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentRange for StaticRange {
    /// A static range always contributes its predicate.
    fn is_empty(&self) -> bool {
        false
    }

    fn set_data(&mut self, _rows: &[Row], config: &RangeConfig) -> Result<(), RangeError> {
        let field = config
            .field
            .clone()
            .ok_or(RangeError::MissingStaticField)?;

        let value = match config.value.clone() {
            Some(Value::Null) | None => return Err(RangeError::MissingStaticValue),
            Some(value) => value.coerce_bool(),
        };

        self.field = Some(field);
        self.value = Some(value);

        Ok(())
    }

    fn apply(&mut self, builder: Option<&mut DmlQueryBuilder>) -> Result<(), RangeError> {
        let builder = builder.ok_or(RangeError::NoActiveBuilder {
            kind: RangeKind::Static,
        })?;

        let (Some(field), Some(value)) = (&self.field, &self.value) else {
            return Err(RangeError::NotPopulated {
                kind: RangeKind::Static,
            });
        };

        let escaper = builder.escaper();
        builder.where_equals(&escaper.column(field), &escaper.escape(value));

        Ok(())
    }
}
