//! Tests for the memory sink

use goodslog_protocol::GoodEvent;

use super::*;

fn events(ids: std::ops::RangeInclusive<i64>) -> Vec<GoodEvent> {
    ids.map(|id| GoodEvent::new(id, 1)).collect()
}

#[tokio::test]
async fn test_records_each_batch_separately() {
    let sink = MemorySink::new();

    sink.append(&events(1..=3)).await.unwrap();
    sink.append(&events(4..=4)).await.unwrap();

    assert_eq!(sink.batch_sizes(), vec![3, 1]);
    let ids: Vec<i64> = sink.rows().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_empty_append_not_recorded() {
    let sink = MemorySink::new();
    sink.append(&[]).await.unwrap();
    assert_eq!(sink.calls(), 0);
    assert!(sink.batches().is_empty());
}

#[tokio::test]
async fn test_clones_share_storage() {
    let sink = MemorySink::new();
    let handle = sink.clone();

    sink.append(&events(1..=2)).await.unwrap();

    assert_eq!(handle.batch_sizes(), vec![2]);
}

#[tokio::test]
async fn test_fail_next_then_recover() {
    let sink = MemorySink::new();
    sink.fail_next(1);

    let err = sink.append(&events(1..=2)).await.unwrap_err();
    assert!(matches!(err, SinkError::Insert { rows: 2, .. }));

    sink.append(&events(3..=3)).await.unwrap();

    assert_eq!(sink.calls(), 2);
    assert_eq!(sink.batch_sizes(), vec![1]);
}

#[tokio::test]
async fn test_fail_always_toggle() {
    let sink = MemorySink::new();
    sink.fail_always(true);

    assert!(sink.append(&events(1..=1)).await.is_err());
    assert!(sink.append(&events(2..=2)).await.is_err());

    sink.fail_always(false);
    assert!(sink.append(&events(3..=3)).await.is_ok());
    assert_eq!(sink.batch_sizes(), vec![1]);
}
