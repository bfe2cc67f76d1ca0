//! Tests for event decoding

use chrono::{TimeZone, Utc};

use crate::error::DecodeError;
use crate::event::GoodEvent;

#[test]
fn test_decode_full_payload() {
    let payload = br#"{
        "id": 42,
        "projectId": 7,
        "name": "Widget",
        "description": "Blue widget",
        "priority": 3,
        "removed": true,
        "createdAt": "2024-05-01T12:00:00Z"
    }"#;

    let event = GoodEvent::decode(payload).unwrap();

    assert_eq!(event.id, 42);
    assert_eq!(event.project_id, 7);
    assert_eq!(event.name, "Widget");
    assert_eq!(event.description.as_deref(), Some("Blue widget"));
    assert_eq!(event.priority, 3);
    assert!(event.removed);
    assert_eq!(
        event.created_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    );
}

#[test]
fn test_decode_partial_payload_uses_zero_values() {
    let event = GoodEvent::decode(br#"{"id": 1, "projectId": 2}"#).unwrap();

    assert_eq!(event, GoodEvent::new(1, 2));
    assert!(event.name.is_empty());
    assert!(event.description.is_none());
    assert_eq!(event.priority, 0);
    assert!(!event.removed);
    assert_eq!(event.created_at.timestamp(), 0);
}

#[test]
fn test_decode_null_description() {
    let event = GoodEvent::decode(br#"{"id": 1, "projectId": 2, "description": null}"#).unwrap();
    assert!(event.description.is_none());
}

#[test]
fn test_decode_null_name() {
    let event = GoodEvent::decode(br#"{"id": 1, "projectId": 2, "name": null}"#).unwrap();
    assert_eq!(event.name, "");
}

#[test]
fn test_decode_ignores_unknown_fields() {
    let event =
        GoodEvent::decode(br#"{"id": 5, "projectId": 1, "color": "red", "weight": 10}"#).unwrap();
    assert_eq!(event.id, 5);
}

#[test]
fn test_decode_missing_id() {
    let err = GoodEvent::decode(br#"{"projectId": 2, "name": "x"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidJson(_)));
}

#[test]
fn test_decode_zero_id() {
    let err = GoodEvent::decode(br#"{"id": 0, "projectId": 2}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("id")));
}

#[test]
fn test_decode_zero_project_id() {
    let err = GoodEvent::decode(br#"{"id": 1, "projectId": 0}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField("projectId")));
}

#[test]
fn test_decode_malformed_json() {
    let err = GoodEvent::decode(b"{not json").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidJson(_)));
}

#[test]
fn test_decode_wrong_field_type() {
    let err = GoodEvent::decode(br#"{"id": "abc", "projectId": 1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidJson(_)));
}

#[test]
fn test_decode_empty_payload() {
    let err = GoodEvent::decode(b"").unwrap_err();
    assert!(matches!(err, DecodeError::EmptyPayload));
}

#[test]
fn test_encode_uses_camel_case() {
    let event = GoodEvent::new(3, 9).with_name("Lamp").with_priority(2);
    let json = String::from_utf8(event.encode().unwrap()).unwrap();

    assert!(json.contains("\"projectId\":9"));
    assert!(json.contains("\"createdAt\""));
    assert!(json.contains("\"name\":\"Lamp\""));
}

#[test]
fn test_encoded_event_decodes_back() {
    let event = GoodEvent::new(11, 4)
        .with_name("Chair")
        .with_description("Oak")
        .with_removed(true)
        .with_created_at(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap());

    let decoded = GoodEvent::decode(&event.encode().unwrap()).unwrap();
    assert_eq!(decoded, event);
}
