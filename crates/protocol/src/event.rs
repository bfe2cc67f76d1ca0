//! Catalog item change event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DecodeError;

/// A single catalog-item change (create, update, remove, reprioritize)
///
/// Decoded from one stream message. Lives only until it is part of a
/// flushed batch or dropped under backpressure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodEvent {
    /// Item identifier
    pub id: i64,

    /// Owning project identifier
    pub project_id: i64,

    /// Item name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Free-form description, absent or `null` upstream
    #[serde(default)]
    pub description: Option<String>,

    /// Ordering priority within the project
    #[serde(default)]
    pub priority: i32,

    /// Soft-delete flag
    #[serde(default)]
    pub removed: bool,

    /// Creation time (Unix epoch when omitted)
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl GoodEvent {
    /// Create an event with the two required identifiers and zero values elsewhere
    pub fn new(id: i64, project_id: i64) -> Self {
        Self {
            id,
            project_id,
            name: String::new(),
            description: None,
            priority: 0,
            removed: false,
            created_at: DateTime::<Utc>::default(),
        }
    }

    /// Decode an event from a JSON message body
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the body is empty, is not valid JSON for the
    /// event schema, or has a zero `id` / `projectId`.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }

        let event: GoodEvent = serde_json::from_slice(payload)?;

        if event.id == 0 {
            return Err(DecodeError::missing_field("id"));
        }
        if event.project_id == 0 {
            return Err(DecodeError::missing_field("projectId"));
        }

        Ok(event)
    }

    /// Encode the event as its JSON wire form
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the item as removed
    pub fn with_removed(mut self, removed: bool) -> Self {
        self.removed = removed;
        self
    }

    /// Set the creation time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Treat an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
