//! Identifier types for the elevator column simulator
//!
//! Columns and elevators are numbered from 1 the way a building labels them;
//! status events carry a UUID-based identifier.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// A floor number. Basements are negative.
pub type Floor = i32;

/// Identifier of a column (shaft group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub u32);

impl ColumnId {
    /// Create a column identifier
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "COL_{}", self.0)
    }
}

/// Identifier of an elevator within its column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElevatorId(pub u32);

impl ElevatorId {
    /// Create an elevator identifier
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElevatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ELV_{}", self.0)
    }
}

/// Unique identifier for a status event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EVT_{}", self.0.simple())
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("EVT_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("EVT_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(EventId(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_id_display() {
        assert_eq!(ColumnId::new(1).to_string(), "COL_1");
        assert_eq!(ElevatorId::new(2).to_string(), "ELV_2");
    }

    #[test]
    fn test_numbered_id_serializes_as_number() {
        let json = serde_json::to_string(&ElevatorId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: ElevatorId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ElevatorId::new(3));
    }

    #[test]
    fn test_event_id_prefix_roundtrip() {
        let id = EventId::new();
        assert_ne!(id, EventId::new());

        let json = serde_json::to_string(&id).unwrap();
        assert!(json.contains("EVT_"));
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_event_id_accepts_raw_uuid() {
        let uuid = Uuid::new_v4();
        let json = format!("\"{}\"", uuid);
        let id: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(id.0, uuid);
    }
}
