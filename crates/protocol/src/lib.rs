//! goodslog Protocol - Event payload types
//!
//! This crate defines the unit that flows through the ingestion pipeline:
//! - `GoodEvent` - one catalog-item change, decoded from one stream message
//! - `DecodeError` - why a message body could not become a `GoodEvent`
//!
//! # Wire Format
//!
//! Each stream message carries exactly one JSON object:
//!
//! ```json
//! {
//!   "id": 42,
//!   "projectId": 7,
//!   "name": "Widget",
//!   "description": "Blue widget",
//!   "priority": 3,
//!   "removed": false,
//!   "createdAt": "2024-05-01T12:00:00Z"
//! }
//! ```
//!
//! `id` and `projectId` are required and must be non-zero. Every other field
//! falls back to its zero value, since upstream partial updates may omit them.

mod error;
mod event;

pub use error::DecodeError;
pub use event::GoodEvent;

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod event_test;
