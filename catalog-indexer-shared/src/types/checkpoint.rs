//! Checkpoint state bounding change detection.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::timestamp;
use crate::types::entity_kind::EntityKind;

/// Per-kind last-synchronized modification timestamps.
///
/// Serialized as a flat JSON object of `"<kind>_last_modified"` keys with
/// formatted timestamp values, the shape persisted wholesale under the single
/// state key. A kind that has never been synchronized reads as
/// [`Checkpoint::sentinel`], so the first run re-syncs the full catalog.
///
/// Values only ever move forward: [`Checkpoint::advance`] ignores candidates
/// that are not strictly greater than the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl Checkpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// The "beginning of time" value returned for kinds with no stored entry.
    pub fn sentinel() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap()
    }

    /// Last-synchronized modification timestamp for `kind`.
    pub fn get(&self, kind: EntityKind) -> DateTime<Utc> {
        self.entries
            .get(&kind.state_key())
            .copied()
            .unwrap_or_else(Self::sentinel)
    }

    /// Raise the checkpoint for `kind` to `candidate` if it moves forward.
    pub fn advance(&mut self, kind: EntityKind, candidate: DateTime<Utc>) {
        let entry = self.entries.entry(kind.state_key()).or_insert(candidate);
        if candidate > *entry {
            *entry = candidate;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Checkpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &timestamp::format_timestamp(value))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Checkpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CheckpointVisitor;

        impl<'de> Visitor<'de> for CheckpointVisitor {
            type Value = Checkpoint;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of state keys to formatted timestamps")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = BTreeMap::new();
                while let Some((key, raw)) = access.next_entry::<String, String>()? {
                    let parsed =
                        timestamp::parse_timestamp(&raw).map_err(serde::de::Error::custom)?;
                    entries.insert(key, parsed);
                }
                Ok(Checkpoint { entries })
            }
        }

        deserializer.deserialize_map(CheckpointVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_kind_reads_sentinel() {
        let checkpoint = Checkpoint::new();
        assert_eq!(checkpoint.get(EntityKind::Movie), Checkpoint::sentinel());
        assert_eq!(
            timestamp::format_timestamp(&Checkpoint::sentinel()),
            "1980-01-01 00:00:00.000000"
        );
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut checkpoint = Checkpoint::new();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        checkpoint.advance(EntityKind::Movie, later);
        checkpoint.advance(EntityKind::Movie, earlier);

        assert_eq!(checkpoint.get(EntityKind::Movie), later);
    }

    #[test]
    fn test_kinds_are_partitioned() {
        let mut checkpoint = Checkpoint::new();
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        checkpoint.advance(EntityKind::Genre, ts);

        assert_eq!(checkpoint.get(EntityKind::Genre), ts);
        assert_eq!(checkpoint.get(EntityKind::Movie), Checkpoint::sentinel());
        assert_eq!(checkpoint.get(EntityKind::Person), Checkpoint::sentinel());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut checkpoint = Checkpoint::new();
        checkpoint.advance(
            EntityKind::Movie,
            Utc.with_ymd_and_hms(2024, 1, 1, 10, 20, 30).unwrap(),
        );

        let json = serde_json::to_string(&checkpoint).unwrap();
        assert_eq!(json, r#"{"movie_last_modified":"2024-01-01 10:20:30.000000"}"#);

        let restored: Checkpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, checkpoint);
    }

    #[test]
    fn test_deserialize_rejects_bad_timestamp() {
        let result: Result<Checkpoint, _> =
            serde_json::from_str(r#"{"movie_last_modified":"yesterday"}"#);
        assert!(result.is_err());
    }
}
