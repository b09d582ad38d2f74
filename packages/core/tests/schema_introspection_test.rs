//! Schema introspection tests: identifier keys, time keys, unique keys.

mod common;

use std::sync::Arc;

use common::{row, MockExecutor};
use tablesync_core::db::QueryError;
use tablesync_core::import::{MariaDbTarget, TargetError};
use tablesync_core::models::UniqueKey;

const UNIQUE_KEYS_SQL: &str = "SELECT `k`.`CONSTRAINT_NAME` AS `name`, \
     GROUP_CONCAT(`k`.`COLUMN_NAME`) AS `columns` \
     FROM `information_schema`.`KEY_COLUMN_USAGE` AS `k` \
     INNER JOIN `information_schema`.`TABLE_CONSTRAINTS` AS `t` \
     ON `k`.`CONSTRAINT_SCHEMA` = `t`.`CONSTRAINT_SCHEMA` \
     AND `k`.`TABLE_NAME` = `t`.`TABLE_NAME` \
     AND `k`.`CONSTRAINT_NAME` = `t`.`CONSTRAINT_NAME` \
     INNER JOIN `information_schema`.`COLUMNS` AS `c` \
     ON `k`.`CONSTRAINT_SCHEMA` = `c`.`TABLE_SCHEMA` \
     AND `k`.`TABLE_NAME` = `c`.`TABLE_NAME` \
     AND `k`.`COLUMN_NAME` = `c`.`COLUMN_NAME` \
     WHERE `k`.`CONSTRAINT_SCHEMA` = 'database' \
     AND `k`.`TABLE_NAME` = 'table' \
     AND `t`.`CONSTRAINT_TYPE` = 'UNIQUE' \
     AND `c`.`EXTRA` != 'STORED GENERATED' \
     GROUP BY `k`.`CONSTRAINT_NAME`";

#[tokio::test]
async fn identifier_keys_queries_primary_key_columns() {
    let mock = Arc::new(MockExecutor::new().expect_rows(vec![
        row(r#"{"Field": "id", "Type": "varchar(36)", "Key": "PRI"}"#),
        row(r#"{"Field": "language", "Type": "varchar(5)", "Key": "PRI"}"#),
    ]));
    let mut target = MariaDbTarget::new(mock.clone());
    target.set_target("table");

    let keys = target.identifier_keys().await.unwrap();

    assert_eq!(keys, vec!["id", "language"]);
    assert_eq!(mock.log(), vec!["SHOW COLUMNS FROM table WHERE `Key` = 'PRI'"]);
}

#[tokio::test]
async fn identifier_keys_are_cached_per_binding() {
    let mock = Arc::new(
        MockExecutor::new()
            .expect_rows(vec![row(r#"{"Field": "id"}"#)])
            .expect_rows(vec![row(r#"{"Field": "uuid"}"#)]),
    );
    let mut target = MariaDbTarget::new(mock.clone());
    target.set_target("table");

    assert_eq!(target.identifier_keys().await.unwrap(), vec!["id"]);
    assert_eq!(target.identifier_keys().await.unwrap(), vec!["id"]);
    assert_eq!(mock.log().len(), 1);

    // Re-binding invalidates the cache.
    target.set_target("other");
    assert_eq!(target.identifier_keys().await.unwrap(), vec!["uuid"]);
    assert_eq!(
        mock.log(),
        vec![
            "SHOW COLUMNS FROM table WHERE `Key` = 'PRI'",
            "SHOW COLUMNS FROM other WHERE `Key` = 'PRI'",
        ]
    );
}

#[tokio::test]
async fn identifier_keys_without_bound_table_fails() {
    let mock = Arc::new(MockExecutor::new());
    let mut target = MariaDbTarget::new(mock.clone());

    let err = target.identifier_keys().await.unwrap_err();

    assert!(matches!(err, TargetError::NoTable));
    assert!(mock.log().is_empty());
}

#[tokio::test]
async fn identifier_keys_propagates_query_errors() {
    let mock = Arc::new(MockExecutor::new().expect_error(QueryError::execution("boom")));
    let mut target = MariaDbTarget::new(mock);
    target.set_target("table");

    let err = target.identifier_keys().await.unwrap_err();

    assert!(matches!(err, TargetError::Query(_)));
}

#[tokio::test]
async fn time_keys_query_and_no_caching() {
    let mock = Arc::new(
        MockExecutor::new()
            .expect_rows(vec![row(r#"{"Field": "modified"}"#)])
            .expect_rows(vec![row(r#"{"Field": "modified"}"#)]),
    );
    let mut target = MariaDbTarget::new(mock.clone());
    target.set_target("table");

    assert_eq!(target.time_keys().await.unwrap(), vec!["modified"]);
    assert_eq!(target.time_keys().await.unwrap(), vec!["modified"]);

    assert_eq!(
        mock.log(),
        vec![
            "SHOW FULL COLUMNS FROM table WHERE `Comment` = 'TIME_KEY'",
            "SHOW FULL COLUMNS FROM table WHERE `Comment` = 'TIME_KEY'",
        ]
    );
}

#[tokio::test]
async fn time_keys_without_bound_table_fails() {
    let mut target = MariaDbTarget::new(Arc::new(MockExecutor::new()));

    assert!(matches!(
        target.time_keys().await.unwrap_err(),
        TargetError::NoTable
    ));
}

#[tokio::test]
async fn unique_keys_queries_information_schema() {
    let mock = Arc::new(MockExecutor::new().expect_rows(vec![row(
        r#"{"name": "key_1", "columns": "column1,column2"}"#,
    )]));
    let mut target = MariaDbTarget::new(mock.clone());
    target.set_target("table");

    let keys = target.unique_keys().await.unwrap();

    assert_eq!(
        keys,
        vec![UniqueKey {
            name: "key_1".to_string(),
            columns: vec!["column1".to_string(), "column2".to_string()],
        }]
    );
    assert_eq!(mock.log(), vec![UNIQUE_KEYS_SQL]);
}

#[tokio::test]
async fn unique_keys_with_no_constraints_returns_empty() {
    let mock = Arc::new(MockExecutor::new().expect_rows(vec![]));
    let mut target = MariaDbTarget::new(mock);
    target.set_target("table");

    assert!(target.unique_keys().await.unwrap().is_empty());
}

#[tokio::test]
async fn unique_keys_without_bound_table_fails() {
    let mock = Arc::new(MockExecutor::new());
    let target = MariaDbTarget::new(mock.clone());

    assert!(matches!(
        target.unique_keys().await.unwrap_err(),
        TargetError::NoTable
    ));
    assert!(mock.log().is_empty());
}
