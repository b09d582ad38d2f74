//! MariaDB Import Target
//!
//! The reconciliation controller. Binds one table, discovers its key
//! structure from the schema catalogs, and applies categorized dataset
//! diffs: new and updated rows stream through batched
//! `INSERT ... ON DUPLICATE KEY UPDATE` statements, obsolete rows drive one
//! conditional `DELETE`, and both run inside a single transaction so the
//! table never ends up half-reconciled.
//!
//! Retry on transient conflicts lives in the [`QueryExecutor`]
//! implementation; batching here stays retry-agnostic.

use std::sync::Arc;

use crate::db::{DmlQueryBuilder, QueryEscaper, QueryExecutor};
use crate::models::{DiffCategory, DiffPayload, Row, UniqueKey};

use super::error::{RangeError, TargetError};
use super::ranges::ContentRange;

/// Default upsert chunk size.
pub const DEFAULT_BATCH_SIZE: usize = 50_000;

/// MariaDB as import target.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use tablesync_core::db::QueryExecutor;
/// # use tablesync_core::import::MariaDbTarget;
/// # use tablesync_core::models::DiffPayload;
/// # async fn run(executor: Arc<dyn QueryExecutor>) -> Result<(), Box<dyn std::error::Error>> {
/// let mut target = MariaDbTarget::new(executor);
/// target.set_target("products");
///
/// let payload: DiffPayload = serde_json::from_str("{}")?;
/// let affected = target.apply_diff(payload, &mut []).await?;
/// # Ok(())
/// # }
/// ```
pub struct MariaDbTarget {
    executor: Arc<dyn QueryExecutor>,
    escaper: QueryEscaper,
    table: Option<String>,
    identifier_keys: Option<Vec<String>>,
    batch_size: usize,
}

impl MariaDbTarget {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            escaper: QueryEscaper::new(),
            table: None,
            identifier_keys: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Bind the table to import to. Re-binding drops the cached identifier
    /// keys, so a later lookup resolves against the new table.
    pub fn set_target(&mut self, table: impl Into<String>) {
        self.table = Some(table.into());
        self.identifier_keys = None;
    }

    /// Set the upsert chunk size. Affects only subsequent diff applications.
    /// A size of zero is treated as one row per batch.
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }

    /// The escaper used for all statements against this target.
    pub fn escaper(&self) -> QueryEscaper {
        self.escaper
    }

    fn require_table(&self) -> Result<&str, TargetError> {
        self.table.as_deref().ok_or(TargetError::NoTable)
    }

    /// Get the primary-key columns of the bound table, memoized until the
    /// binding changes.
    pub async fn identifier_keys(&mut self) -> Result<Vec<String>, TargetError> {
        let table = self.require_table()?.to_string();

        if let Some(keys) = &self.identifier_keys {
            return Ok(keys.clone());
        }

        let sql = format!("SHOW COLUMNS FROM {table} WHERE `Key` = 'PRI'");
        let result = self.executor.query(&sql).await?;

        let keys = result.column("Field");
        self.identifier_keys = Some(keys.clone());

        Ok(keys)
    }

    /// Get the columns annotated as age/version markers.
    pub async fn time_keys(&self) -> Result<Vec<String>, TargetError> {
        let table = self.require_table()?;

        let sql = format!("SHOW FULL COLUMNS FROM {table} WHERE `Comment` = 'TIME_KEY'");
        let result = self.executor.query(&sql).await?;

        Ok(result.column("Field"))
    }

    /// Get the non-primary unique constraints of the bound table, excluding
    /// stored-generated columns.
    pub async fn unique_keys(&self) -> Result<Vec<UniqueKey>, TargetError> {
        let table = self.require_table()?;
        let escaper = self.escaper;

        let mut builder = DmlQueryBuilder::new(escaper);
        builder.select("`k`.`CONSTRAINT_NAME` AS `name`, GROUP_CONCAT(`k`.`COLUMN_NAME`) AS `columns`");
        builder.from(&escaper.table("information_schema.KEY_COLUMN_USAGE", Some("k")));
        builder.join(&escaper.table("information_schema.TABLE_CONSTRAINTS", Some("t")));
        builder.on(&escaper.column("k.CONSTRAINT_SCHEMA"), &escaper.column("t.CONSTRAINT_SCHEMA"));
        builder.on(&escaper.column("k.TABLE_NAME"), &escaper.column("t.TABLE_NAME"));
        builder.on(&escaper.column("k.CONSTRAINT_NAME"), &escaper.column("t.CONSTRAINT_NAME"));
        builder.join(&escaper.table("information_schema.COLUMNS", Some("c")));
        builder.on(&escaper.column("k.CONSTRAINT_SCHEMA"), &escaper.column("c.TABLE_SCHEMA"));
        builder.on(&escaper.column("k.TABLE_NAME"), &escaper.column("c.TABLE_NAME"));
        builder.on(&escaper.column("k.COLUMN_NAME"), &escaper.column("c.COLUMN_NAME"));
        builder.where_equals(
            &escaper.column("k.CONSTRAINT_SCHEMA"),
            &escaper.value(&self.executor.database()),
        );
        builder.where_equals(&escaper.column("k.TABLE_NAME"), &escaper.value(table));
        builder.where_equals(&escaper.column("t.CONSTRAINT_TYPE"), &escaper.value("UNIQUE"));
        builder.where_compare(
            &escaper.column("c.EXTRA"),
            &escaper.value("STORED GENERATED"),
            "!=",
        );
        builder.group_by(&escaper.column("k.CONSTRAINT_NAME"));

        let result = self.executor.query(&builder.select_query()).await?;

        Ok(result
            .rows
            .iter()
            .filter_map(|row| {
                let name = row.get("name")?.as_str()?;
                let columns = row.get("columns")?.as_str()?;
                Some(UniqueKey::from_grouped(name, columns))
            })
            .collect())
    }

    /// Read current data, optionally restricted to the given columns and
    /// narrowed by ranges. Geometry-typed columns are wrapped in a text
    /// conversion so results are always textual.
    pub async fn read(
        &mut self,
        fields: Option<&[String]>,
        ranges: &mut [Box<dyn ContentRange>],
    ) -> Result<Vec<Row>, TargetError> {
        let table = self.require_table()?.to_string();

        let mut builder = DmlQueryBuilder::new(self.escaper);

        // An omitted or empty column list selects everything.
        if let Some(fields) = fields.filter(|fields| !fields.is_empty()) {
            let columns = self.escape_columns(fields).await?;
            if !columns.is_empty() {
                builder.select(&columns.join(","));
            }
        }

        builder.from(&self.escaper.table(&table, None));

        Self::apply_ranges(&mut builder, ranges)?;

        let result = self.executor.query(&builder.select_query()).await?;

        Ok(result.rows)
    }

    /// Apply a categorized diff: upsert new and updated rows, delete
    /// obsolete ones, all in one transaction. Returns the total number of
    /// affected rows.
    pub async fn apply_diff(
        &mut self,
        mut payload: DiffPayload,
        ranges: &mut [Box<dyn ContentRange>],
    ) -> Result<u64, TargetError> {
        let table = self.require_table()?.to_string();

        self.executor.begin_transaction().await?;

        let mut merged = payload.take(DiffCategory::New);
        merged.extend(payload.take(DiffCategory::Updated));

        let replaced = self.replace_data(merged).await?;
        let deleted = self
            .delete_data(payload.take(DiffCategory::Obsolete), ranges)
            .await?;

        self.executor.commit_transaction().await?;

        tracing::debug!(replaced, deleted, "applied diff to {table}");

        Ok(replaced + deleted)
    }

    /// Escape every value of a row by its runtime kind, in column order.
    fn escape_item(&self, row: &Row) -> Vec<String> {
        row.iter()
            .map(|(_, value)| self.escaper.escape(value))
            .collect()
    }

    /// Resolve selected columns against the table's column catalog; unknown
    /// columns are dropped and geometry columns converted to text.
    async fn escape_columns(&self, columns: &[String]) -> Result<Vec<String>, TargetError> {
        let table = self.require_table()?;

        let result = self.executor.query(&format!("SHOW FIELDS FROM {table}")).await?;

        let catalog: Vec<(String, String)> = result
            .rows
            .iter()
            .filter_map(|row| {
                let field = row.get("Field")?.as_str()?;
                let column_type = row.get("Type")?.as_str()?;
                Some((field.to_string(), column_type.to_string()))
            })
            .collect();

        let mut escaped = Vec::new();

        for column in columns {
            let Some((_, column_type)) = catalog.iter().find(|(field, _)| field == column) else {
                continue;
            };

            let reference = self.escaper.result_column(column);

            if QueryEscaper::is_wkt_type(column_type) {
                escaped.push(format!("ST_AsText({reference}) AS {reference}"));
            } else {
                escaped.push(reference);
            }
        }

        Ok(escaped)
    }

    /// Insert new and update existing rows in batches.
    ///
    /// The first row fixes the batch's column signature. The whole input is
    /// scanned even after a mismatch so every offending row gets logged;
    /// only then does the operation fail, without having issued a single
    /// statement.
    async fn replace_data(&self, rows: Vec<Row>) -> Result<u64, TargetError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let table = self.require_table()?.to_string();

        let canonical: Vec<String> = rows[0].columns().map(str::to_string).collect();

        let mut batches: Vec<Vec<Vec<String>>> = Vec::new();
        let mut mismatch = false;

        for (position, row) in rows.iter().enumerate() {
            let index = position + 1;
            let mut batch = index / self.batch_size;
            // An exact multiple belongs to the previous batch; this keeps
            // every full batch at exactly batch_size rows.
            if index % self.batch_size == 0 {
                batch -= 1;
            }

            if batch == batches.len() {
                batches.push(Vec::new());
            }
            batches[batch].push(self.escape_item(row));

            let item_columns: Vec<&str> = row.columns().collect();

            if item_columns.iter().copied().eq(canonical.iter().map(String::as_str)) {
                continue;
            }

            mismatch = true;

            let diff: Vec<&str> = if canonical.len() > item_columns.len() {
                canonical
                    .iter()
                    .map(String::as_str)
                    .filter(|column| !item_columns.contains(column))
                    .collect()
            } else {
                item_columns
                    .iter()
                    .copied()
                    .filter(|column| !canonical.iter().any(|c| c == column))
                    .collect()
            };

            tracing::warn!(
                "Column mismatch for item ({} vs {}): {}",
                canonical.len(),
                item_columns.len(),
                serde_json::to_string(&diff).unwrap_or_default()
            );
        }

        if mismatch {
            return Err(TargetError::NonUniformStructure);
        }

        let update_columns = canonical
            .iter()
            .map(|column| {
                let reference = self.escaper.result_column(column);
                format!("{reference} = VALUES({reference})")
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut affected = 0u64;

        for batch in batches {
            let mut builder = DmlQueryBuilder::new(self.escaper);
            builder.insert_into(&table);
            builder.column_names(&canonical);
            builder.values(batch);
            builder.on_duplicate_key_update(&update_columns);

            let result = self.executor.query(&builder.insert_query()).await?;

            affected += result.affected_rows;
        }

        Ok(affected)
    }

    /// Delete the given rows, matched by identifier columns and narrowed by
    /// the supplied ranges.
    async fn delete_data(
        &mut self,
        rows: Vec<Row>,
        ranges: &mut [Box<dyn ContentRange>],
    ) -> Result<u64, TargetError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let keys = self.identifier_keys().await?;
        let table = self.require_table()?.to_string();

        let mut builder = DmlQueryBuilder::new(self.escaper);
        builder.from(&self.escaper.table(&table, None));

        builder.start_where_group();

        for row in &rows {
            builder.start_where_group();

            for key in &keys {
                let value = row
                    .get(key)
                    .cloned()
                    .unwrap_or(crate::models::Value::Null)
                    .coerce_bool();

                builder.where_equals(&self.escaper.column(key), &self.escaper.escape(&value));
            }

            builder.end_where_group();
            builder.sql_or();
        }

        builder.end_where_group();
        builder.sql_and();

        Self::apply_ranges(&mut builder, ranges)?;

        let result = self.executor.query(&builder.delete_query()).await?;

        Ok(result.affected_rows)
    }

    /// Contribute every non-empty range as one parenthesized predicate
    /// group, ANDed across ranges. A range's dangling OR is absorbed.
    fn apply_ranges(
        builder: &mut DmlQueryBuilder,
        ranges: &mut [Box<dyn ContentRange>],
    ) -> Result<(), RangeError> {
        for range in ranges.iter_mut() {
            if range.is_empty() {
                continue;
            }

            builder.start_where_group();
            range.apply(Some(builder))?;
            builder.end_where_group();
            builder.sql_and();
        }

        Ok(())
    }
}
