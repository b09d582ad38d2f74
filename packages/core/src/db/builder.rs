//! DML Query Builder
//!
//! Mutable assembler for the three statement shapes the import target
//! issues: SELECT (with joins and GROUP BY for the information-schema
//! lookup), INSERT ... ON DUPLICATE KEY UPDATE, and DELETE.
//!
//! WHERE construction works with explicit groups and a pending connective:
//! each predicate or group opener consumes the pending AND/OR (defaulting to
//! AND), and calling [`sql_and`](DmlQueryBuilder::sql_and) /
//! [`sql_or`](DmlQueryBuilder::sql_or) overwrites it. A caller that just
//! closed an OR chain can therefore neutralize the dangling OR by calling
//! `sql_and()` before appending the next group.
//!
//! Identifier and literal fragments are escaped by the caller through the
//! builder's [`QueryEscaper`]; the builder only assembles.

use super::QueryEscaper;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Connective {
    And,
    Or,
}

/// Mutable SELECT/INSERT/DELETE statement builder.
#[derive(Debug)]
pub struct DmlQueryBuilder {
    escaper: QueryEscaper,
    select: Vec<String>,
    from: Option<String>,
    joins: Vec<String>,
    where_clause: String,
    group_by: Vec<String>,
    into_table: Option<String>,
    columns: Vec<String>,
    tuples: Vec<String>,
    on_duplicate: Option<String>,
    pending: Option<Connective>,
}

impl DmlQueryBuilder {
    pub fn new(escaper: QueryEscaper) -> Self {
        Self {
            escaper,
            select: Vec::new(),
            from: None,
            joins: Vec::new(),
            where_clause: String::new(),
            group_by: Vec::new(),
            into_table: None,
            columns: Vec::new(),
            tuples: Vec::new(),
            on_duplicate: None,
            pending: None,
        }
    }

    /// The escaper paired with this builder.
    pub fn escaper(&self) -> QueryEscaper {
        self.escaper
    }

    /// Append a select expression (already escaped).
    pub fn select(&mut self, expression: &str) {
        self.select.push(expression.to_string());
    }

    /// Set the source table reference (already escaped).
    pub fn from(&mut self, table: &str) {
        self.from = Some(table.to_string());
    }

    /// Append an inner join against an already escaped table reference.
    pub fn join(&mut self, table: &str) {
        self.joins.push(format!("INNER JOIN {table}"));
    }

    /// Append a join condition to the most recent join. Multiple conditions
    /// on the same join are ANDed.
    pub fn on(&mut self, left: &str, right: &str) {
        if let Some(join) = self.joins.last_mut() {
            if join.contains(" ON ") {
                join.push_str(&format!(" AND {left} = {right}"));
            } else {
                join.push_str(&format!(" ON {left} = {right}"));
            }
        }
    }

    /// Open a parenthesized WHERE group. The opener consumes the pending
    /// connective like any predicate.
    pub fn start_where_group(&mut self) {
        self.push_where_part("(");
    }

    /// Close the current WHERE group. The pending connective survives, so a
    /// dangling OR set inside the group still applies to whatever follows
    /// unless overwritten.
    pub fn end_where_group(&mut self) {
        self.where_clause.push(')');
    }

    /// Append an equality predicate from escaped fragments.
    pub fn where_equals(&mut self, column: &str, value: &str) {
        self.push_where_part(&format!("{column} = {value}"));
    }

    /// Append a comparison predicate with an explicit operator.
    pub fn where_compare(&mut self, column: &str, value: &str, operator: &str) {
        self.push_where_part(&format!("{column} {operator} {value}"));
    }

    /// Append an IN predicate from an escaped column and list literal.
    pub fn where_in(&mut self, column: &str, list: &str) {
        self.push_where_part(&format!("{column} IN {list}"));
    }

    /// Connect the next predicate or group with AND (also used to overwrite
    /// a dangling OR).
    pub fn sql_and(&mut self) {
        self.pending = Some(Connective::And);
    }

    /// Connect the next predicate or group with OR.
    pub fn sql_or(&mut self) {
        self.pending = Some(Connective::Or);
    }

    pub fn group_by(&mut self, column: &str) {
        self.group_by.push(column.to_string());
    }

    /// Set the insert target table (raw name, escaped here).
    pub fn insert_into(&mut self, table: &str) {
        self.into_table = Some(self.escaper.column(table));
    }

    /// Set the insert column list (raw names, escaped here).
    pub fn column_names(&mut self, columns: &[String]) {
        self.columns = columns
            .iter()
            .map(|column| self.escaper.result_column(column))
            .collect();
    }

    /// Append value tuples; each row is a list of already-escaped literals.
    pub fn values(&mut self, rows: Vec<Vec<String>>) {
        for row in rows {
            self.tuples.push(format!("({})", row.join(", ")));
        }
    }

    /// Set the ON DUPLICATE KEY UPDATE expression (already escaped).
    pub fn on_duplicate_key_update(&mut self, expression: &str) {
        self.on_duplicate = Some(expression.to_string());
    }

    /// Assemble the SELECT statement.
    pub fn select_query(&self) -> String {
        let columns = if self.select.is_empty() {
            "*".to_string()
        } else {
            self.select.join(", ")
        };

        let mut sql = format!("SELECT {columns}");
        if let Some(from) = &self.from {
            sql.push_str(" FROM ");
            sql.push_str(from);
        }
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        self.append_where(&mut sql);
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        sql
    }

    /// Assemble the INSERT statement.
    pub fn insert_query(&self) -> String {
        let table = self.into_table.as_deref().unwrap_or_default();
        let mut sql = format!(
            "INSERT INTO {table} ({}) VALUES {}",
            self.columns.join(", "),
            self.tuples.join(", ")
        );
        if let Some(update) = &self.on_duplicate {
            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            sql.push_str(update);
        }
        sql
    }

    /// Assemble the DELETE statement.
    pub fn delete_query(&self) -> String {
        let mut sql = format!("DELETE FROM {}", self.from.as_deref().unwrap_or_default());
        self.append_where(&mut sql);
        sql
    }

    fn append_where(&self, sql: &mut String) {
        if !self.where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clause);
        }
    }

    fn push_where_part(&mut self, part: &str) {
        let pending = self.pending.take();

        // No connective at the start of the clause or right after an opener.
        if !self.where_clause.is_empty() && !self.where_clause.ends_with('(') {
            match pending.unwrap_or(Connective::And) {
                Connective::And => self.where_clause.push_str(" AND "),
                Connective::Or => self.where_clause.push_str(" OR "),
            }
        }

        self.where_clause.push_str(part);
    }
}
