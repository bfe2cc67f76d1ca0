//! Tests for common sink types

use crate::SinkError;

#[test]
fn test_connection_error_display() {
    let err = SinkError::connection("http://ch:8123", "connection refused");
    let msg = err.to_string();
    assert!(msg.contains("http://ch:8123"));
    assert!(msg.contains("connection refused"));
}

#[test]
fn test_insert_error_display() {
    let err = SinkError::insert("goods", 10, "table does not exist");
    assert_eq!(
        err.to_string(),
        "insert of 10 rows into goods failed: table does not exist"
    );
}

#[test]
fn test_insert_error_fields() {
    let err = SinkError::insert("goods", 3, "timeout");
    assert!(matches!(
        err,
        SinkError::Insert { rows: 3, ref table, .. } if table == "goods"
    ));
}
