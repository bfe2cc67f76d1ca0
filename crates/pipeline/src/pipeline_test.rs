//! End-to-end tests over the in-memory stream and sink

use std::time::Duration;

use goodslog_config::Config;
use goodslog_protocol::GoodEvent;
use goodslog_sinks::MemorySink;
use goodslog_sources::MemoryStream;

use super::*;

fn config(batch_size: usize) -> PipelineConfig {
    PipelineConfig::default()
        .with_batch_size(batch_size)
        .with_flush_interval(Duration::from_secs(30))
}

fn push(stream: &MemoryStream, ids: impl IntoIterator<Item = i64>) {
    for id in ids {
        stream.push_event(&GoodEvent::new(id, 42).with_name(format!("good-{id}")));
    }
}

async fn advance(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}

fn batch_ids(sink: &MemorySink) -> Vec<Vec<i64>> {
    sink.batches()
        .iter()
        .map(|b| b.iter().map(|e| e.id).collect())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_size_then_interval_scenario() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();

    push(&stream, 1..=3);
    let mut pipeline = Pipeline::spawn(stream.clone(), sink.clone(), config(3)).unwrap();

    advance(1).await;
    assert_eq!(batch_ids(&sink), vec![vec![1, 2, 3]]);

    push(&stream, [4]);
    advance(34).await;
    assert_eq!(batch_ids(&sink), vec![vec![1, 2, 3], vec![4]]);

    let report = pipeline.stop().await;
    assert_eq!(sink.calls(), 2);

    let accumulator = report.accumulator.unwrap();
    assert_eq!(accumulator.flushes, 2);
    assert_eq!(accumulator.rows_written, 4);
    assert_eq!(report.consumer.unwrap().acks, 4);
}

#[tokio::test(start_paused = true)]
async fn test_stop_flushes_partial_batch() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();

    push(&stream, [10, 11]);
    let mut pipeline = Pipeline::spawn(stream.clone(), sink.clone(), config(5)).unwrap();
    advance(3).await;
    assert_eq!(sink.calls(), 0);

    let report = pipeline.stop().await;

    assert_eq!(batch_ids(&sink), vec![vec![10, 11]]);
    assert_eq!(report.accumulator.unwrap().rows_written, 2);
    assert!(stream.is_closed());
    assert!(!pipeline.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();

    push(&stream, [1]);
    let mut pipeline = Pipeline::spawn(stream, sink.clone(), config(5)).unwrap();
    advance(1).await;

    let first = pipeline.stop().await;
    let second = pipeline.stop().await;

    assert_eq!(first, second);
    assert_eq!(sink.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_message_does_not_reach_sink() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();

    push(&stream, [1, 2]);
    stream.push(r#"{"id": "not a number"}"#);
    push(&stream, [3]);

    let mut pipeline = Pipeline::spawn(stream, sink.clone(), config(10)).unwrap();
    advance(1).await;
    let report = pipeline.stop().await;

    assert_eq!(batch_ids(&sink), vec![vec![1, 2, 3]]);
    assert_eq!(report.consumer.unwrap().decode_errors, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_flush_loses_acked_batch() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();
    sink.fail_always(true);

    push(&stream, 1..=3);
    let mut pipeline = Pipeline::spawn(stream.clone(), sink.clone(), config(3)).unwrap();
    advance(1).await;
    let report = pipeline.stop().await;

    // Acked on enqueue, so the broker will not redeliver them.
    assert_eq!(stream.acked(), vec![1, 2, 3]);
    assert!(sink.batches().is_empty());

    let accumulator = report.accumulator.unwrap();
    assert_eq!(accumulator.flush_failures, 1);
    assert_eq!(accumulator.rows_lost, 3);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_idle_stream() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();

    let mut pipeline = Pipeline::spawn(stream, sink.clone(), config(3)).unwrap();
    advance(7).await;
    let report = pipeline.stop().await;

    assert_eq!(sink.calls(), 0);
    assert!(report.consumer.is_some());
    assert!(report.accumulator.is_some());
}

#[tokio::test]
async fn test_spawn_rejects_zero_batch_size() {
    let result = Pipeline::spawn(MemoryStream::new(), MemorySink::new(), config(0));
    assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_spawn_rejects_oversized_batch_size() {
    let config = config(goodslog_config::MAX_BATCH_SIZE + 1);
    let result = Pipeline::spawn(MemoryStream::new(), MemorySink::new(), config);
    assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_spawn_rejects_unbounded_flush_interval() {
    let config = config(3).with_flush_interval(Duration::from_secs(u64::MAX));
    let result = Pipeline::spawn(MemoryStream::new(), MemorySink::new(), config);
    assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn test_live_metrics_before_stop() {
    let stream = MemoryStream::new();
    let sink = MemorySink::new();

    push(&stream, 1..=4);
    let mut pipeline = Pipeline::spawn(stream, sink, config(3)).unwrap();
    advance(1).await;

    let consumer = pipeline.consumer_metrics();
    assert_eq!(consumer.events_enqueued, 4);
    assert_eq!(consumer.acks, 4);

    let accumulator = pipeline.accumulator_metrics();
    assert_eq!(accumulator.events_received, 4);
    assert_eq!(accumulator.rows_written, 3);

    let report = pipeline.stop().await;
    assert_eq!(report.accumulator.unwrap().rows_written, 4);
    assert_eq!(pipeline.accumulator_metrics().rows_written, 4);
}

#[test]
fn test_channel_capacity_is_twice_batch_size() {
    assert_eq!(config(10).channel_capacity(), 20);
    assert_eq!(config(usize::MAX).channel_capacity(), usize::MAX);
}

#[test]
fn test_config_mapping_defaults() {
    let config = Config::default();

    let pipeline = PipelineConfig::from(&config);
    assert_eq!(pipeline.batch_size, 10);
    assert_eq!(pipeline.flush_interval, Duration::from_secs(30));

    let js = jetstream_config(&config);
    assert_eq!(js.url, "nats://localhost:4222");
    assert!(js.credentials.is_none());
    assert_eq!(js.stream_name, "GOODS");
    assert_eq!(js.subject, "goods.logs");
    assert_eq!(js.consumer_name, "goods-logs-consumer");

    let ch = clickhouse_config(&config);
    assert_eq!(ch.url, "http://localhost:8123");
    assert_eq!(ch.qualified_table(), "catalog.goods");
    assert_eq!(ch.username.as_deref(), Some("default"));
}

#[test]
fn test_config_mapping_credentials() {
    let config: Config = r#"
        [nats]
        host = "broker"
        port = 4333
        user = "ingest"
        password = "pw"
        batch_size = 50

        [clickhouse]
        username = ""
        flush_interval = "5s"
    "#
    .parse()
    .unwrap();

    let js = jetstream_config(&config);
    assert_eq!(js.url, "nats://broker:4333");
    assert_eq!(js.credentials, Some(("ingest".into(), "pw".into())));

    let ch = clickhouse_config(&config);
    assert!(ch.username.is_none());

    let pipeline = PipelineConfig::from(&config);
    assert_eq!(pipeline.batch_size, 50);
    assert_eq!(pipeline.flush_interval, Duration::from_secs(5));
}
