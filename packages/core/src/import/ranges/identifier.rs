//! Identifier Range
//!
//! Filters by primary-key identity: every populated row contributes one
//! AND-group matching all identifier columns, OR'd across rows.

use crate::db::DmlQueryBuilder;
use crate::import::error::{RangeError, RangeKind};
use crate::models::Row;

use super::{ContentRange, RangeConfig};

/// Range matching rows by their identifier columns.
///
/// Constructed with the target's cached identifier keys; `set_data` projects
/// every input row down to exactly those columns.
#[derive(Debug)]
pub struct IdentifierRange {
    keys: Vec<String>,
    data: Vec<Row>,
}

impl IdentifierRange {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            data: Vec::new(),
        }
    }
}

impl ContentRange for IdentifierRange {
    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn set_data(&mut self, rows: &[Row], _config: &RangeConfig) -> Result<(), RangeError> {
        for row in rows {
            self.data.push(row.project(&self.keys));
        }

        if self.is_empty() {
            return Err(RangeError::EmptyIdentifierRange);
        }

        Ok(())
    }

    fn apply(&mut self, builder: Option<&mut DmlQueryBuilder>) -> Result<(), RangeError> {
        let builder = builder.ok_or(RangeError::NoActiveBuilder {
            kind: RangeKind::Identifier,
        })?;
        let escaper = builder.escaper();

        for row in self.data.drain(..) {
            builder.start_where_group();

            for (column, value) in row.iter() {
                builder.where_equals(
                    &escaper.column(column),
                    &escaper.escape(&value.clone().coerce_bool()),
                );
            }

            builder.end_where_group();
            builder.sql_or();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::QueryEscaper;
    use crate::models::Value;

    fn keys() -> Vec<String> {
        vec!["id".to_string(), "category".to_string()]
    }

    fn row(id: i64, category: &str) -> Row {
        Row::from(vec![
            ("id".to_string(), Value::from(id)),
            ("category".to_string(), Value::from(category)),
            ("value".to_string(), Value::from("Foo")),
            ("timestamp".to_string(), Value::from(1768836579)),
        ])
    }

    #[test]
    fn test_set_data_with_empty_input_fails() {
        let mut range = IdentifierRange::new(keys());

        let err = range.set_data(&[], &RangeConfig::default()).unwrap_err();

        assert!(matches!(err, RangeError::EmptyIdentifierRange));
        assert!(range.is_empty());
    }

    #[test]
    fn test_set_data_projects_rows_onto_identifier_columns() {
        let mut range = IdentifierRange::new(keys());

        range
            .set_data(&[row(1, "Bar"), row(2, "Bar")], &RangeConfig::default())
            .unwrap();

        assert!(!range.is_empty());
        assert_eq!(range.data.len(), 2);
        let columns: Vec<&str> = range.data[0].columns().collect();
        assert_eq!(columns, vec!["id", "category"]);
        assert_eq!(range.data[1].get("id"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_apply_without_builder_fails_and_keeps_data() {
        let mut range = IdentifierRange::new(keys());
        range
            .set_data(&[row(1, "Bar")], &RangeConfig::default())
            .unwrap();

        let err = range.apply(None).unwrap_err();

        assert_eq!(
            err.to_string(),
            "tried to apply identifier range, but no query builder is active"
        );
        assert!(!range.is_empty());
    }

    #[test]
    fn test_apply_emits_or_separated_equality_groups() {
        let mut range = IdentifierRange::new(keys());
        range
            .set_data(&[row(1, "Bar"), row(2, "Baz")], &RangeConfig::default())
            .unwrap();

        let mut builder = DmlQueryBuilder::new(QueryEscaper::new());
        builder.from("`table`");
        range.apply(Some(&mut builder)).unwrap();

        assert_eq!(
            builder.select_query(),
            "SELECT * FROM `table` WHERE (`id` = 1 AND `category` = 'Bar') \
             OR (`id` = 2 AND `category` = 'Baz')"
        );
    }

    #[test]
    fn test_apply_coerces_boolean_identifiers() {
        let mut range = IdentifierRange::new(vec!["enabled".to_string()]);
        let rows = [Row::from(vec![(
            "enabled".to_string(),
            Value::from(true),
        )])];
        range.set_data(&rows, &RangeConfig::default()).unwrap();

        let mut builder = DmlQueryBuilder::new(QueryEscaper::new());
        builder.from("`table`");
        range.apply(Some(&mut builder)).unwrap();

        assert_eq!(
            builder.select_query(),
            "SELECT * FROM `table` WHERE (`enabled` = 1)"
        );
    }

    #[test]
    fn test_apply_drains_the_range() {
        let mut range = IdentifierRange::new(keys());
        range
            .set_data(&[row(1, "Bar")], &RangeConfig::default())
            .unwrap();

        let mut builder = DmlQueryBuilder::new(QueryEscaper::new());
        range.apply(Some(&mut builder)).unwrap();

        assert!(range.is_empty());
    }
}
