//! Persisted sheet snapshot
//!
//! A snapshot is the whole saved state: the roster plus every stored mark,
//! orphans included. Saves always use the flat encoding:
//!
//! ```json
//! {
//!   "version": 1,
//!   "players": [{"id": 1, "name": "You"}],
//!   "last_player_id": 1,
//!   "marks": {"revolver:1": 1},
//!   "saved_at": "2026-10-19T12:00:00Z"
//! }
//! ```
//!
//! Loads also accept the older nested encoding, where `marks` (or
//! `gameData`) maps each card to a map of player id to mark, and mark values
//! may be names instead of ordinals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{Catalog, Mark, MarkKey, MarkStore, Player, PlayerId, Roster, Session};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Snapshot has no players")]
    EmptyRoster,

    #[error("Snapshot lists the same player id more than once")]
    DuplicatePlayer,

    #[error("Unsupported snapshot version {0} (newest known is {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u32),

    #[error("Snapshot uses player id {0}, which cannot be allocated")]
    PlayerIdOutOfRange(u32),
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Serializable form of a [`Session`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,

    pub players: Vec<Player>,

    /// Highest player id ever allocated
    #[serde(default)]
    pub last_player_id: u32,

    #[serde(default, alias = "gameData")]
    pub marks: MarkEntries,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Captures the current state of a session
    pub fn capture(session: &Session) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            players: session.players().to_vec(),
            last_player_id: session.roster().high_water(),
            marks: MarkEntries(
                session
                    .marks()
                    .iter()
                    .map(|(key, mark)| (key.clone(), mark))
                    .collect(),
            ),
            saved_at: Some(Utc::now()),
        }
    }

    /// Rebuilds a session, rejecting snapshots that would break the roster
    /// invariants
    pub fn into_session(self) -> Result<Session, SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        if self.players.is_empty() {
            return Err(SnapshotError::EmptyRoster);
        }
        self.check_player_ids()?;
        let roster = Roster::from_players(self.players, self.last_player_id)
            .ok_or(SnapshotError::DuplicatePlayer)?;
        let marks: MarkStore = self.marks.0.into_iter().collect();
        Ok(Session::from_parts(roster, marks))
    }

    /// Live ids must be positive, and no id may sit at the top of the range
    /// or the next `add` would have nothing left to allocate
    fn check_player_ids(&self) -> Result<(), SnapshotError> {
        if self.players.iter().any(|p| p.id.get() == 0) {
            return Err(SnapshotError::PlayerIdOutOfRange(0));
        }
        let live = self.players.iter().map(|p| p.id.get());
        let marked = self.marks.0.keys().map(|key| key.player.get());
        let highest = live
            .chain(marked)
            .chain(std::iter::once(self.last_player_id))
            .max()
            .unwrap_or(0);
        if highest >= PlayerId::MAX.get() {
            return Err(SnapshotError::PlayerIdOutOfRange(highest));
        }
        Ok(())
    }

    /// Parses a snapshot from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Renders the snapshot as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Stored marks, kept sorted so saved files diff cleanly
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkEntries(pub BTreeMap<MarkKey, Mark>);

impl MarkEntries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Nested encodings key cards by id or by display name
fn canonical_card_id(raw: &str) -> String {
    Catalog
        .resolve(raw)
        .map(|card| card.id.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

impl Serialize for MarkEntries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, mark) in &self.0 {
            map.serialize_entry(&key.to_string(), mark)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MarkEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = MarkEntries;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of \"card:player\" keys or a map of card to player marks")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = BTreeMap::new();

                // Flat:   {"rope:1": 2}
                // Nested: {"rope": {"1": 2}} or {"Rope": {"1": "maybe"}}
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    match value {
                        serde_json::Value::Object(players) => {
                            let card = canonical_card_id(&key);
                            for (player, mark) in players {
                                let player: PlayerId = player.parse().map_err(|_| {
                                    de::Error::custom(format!("invalid player id '{}' under card '{}'", player, key))
                                })?;
                                let mark: Mark = serde_json::from_value(mark).map_err(de::Error::custom)?;
                                entries.insert(MarkKey::new(card.clone(), player), mark);
                            }
                        }
                        flat => {
                            let parsed: MarkKey = key.parse().map_err(de::Error::custom)?;
                            let key = MarkKey::new(canonical_card_id(&parsed.card), parsed.player);
                            let mark: Mark = serde_json::from_value(flat).map_err(de::Error::custom)?;
                            entries.insert(key, mark);
                        }
                    }
                }

                entries.retain(|_, mark| !mark.is_unknown());
                Ok(MarkEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
