//! Marks and the mark store
//!
//! A mark is one player's belief about one card. Marks are ordered
//! `Unknown < No < Maybe < Yes`; the ordinal is both the cycling order and
//! the persisted encoding.
//!
//! The store is sparse: only pairs that were explicitly marked occupy an
//! entry, and a read on a missing pair yields [`Mark::Unknown`]. Writing
//! `Unknown` drops the entry, so "unset" and "stored Unknown" never diverge.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::player::PlayerId;
use super::LookupError;

/// Belief state of one (card, player) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Mark {
    #[default]
    Unknown,
    /// The player does not hold the card
    No,
    /// The player might hold the card
    Maybe,
    /// The player holds the card
    Yes,
}

impl Mark {
    /// Every mark in ordinal order
    pub const ALL: [Mark; 4] = [Mark::Unknown, Mark::No, Mark::Maybe, Mark::Yes];

    /// Next state in the single-tap rotation, wrapping `Yes` back to `Unknown`
    pub fn next(self) -> Mark {
        match self {
            Mark::Unknown => Mark::No,
            Mark::No => Mark::Maybe,
            Mark::Maybe => Mark::Yes,
            Mark::Yes => Mark::Unknown,
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: u8) -> Option<Mark> {
        Mark::ALL.get(usize::from(value)).copied()
    }

    pub fn is_unknown(self) -> bool {
        self == Mark::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::Unknown => "unknown",
            Mark::No => "no",
            Mark::Maybe => "maybe",
            Mark::Yes => "yes",
        }
    }

    /// Single-character cell glyph
    pub fn glyph(self) -> &'static str {
        match self {
            Mark::Unknown => "·",
            Mark::No => "✕",
            Mark::Maybe => "?",
            Mark::Yes => "✓",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mark {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" | "clear" | "none" | "0" => Ok(Mark::Unknown),
            "no" | "n" | "x" | "1" => Ok(Mark::No),
            "maybe" | "m" | "?" | "2" => Ok(Mark::Maybe),
            "yes" | "y" | "3" => Ok(Mark::Yes),
            _ => Err(LookupError::InvalidMark(s.to_string())),
        }
    }
}

impl Serialize for Mark {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for Mark {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct MarkVisitor;

        impl Visitor<'_> for MarkVisitor {
            type Value = Mark;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mark ordinal 0..=3 or a mark name")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Mark, E>
            where
                E: de::Error,
            {
                u8::try_from(value)
                    .ok()
                    .and_then(Mark::from_ordinal)
                    .ok_or_else(|| E::custom(format!("mark ordinal out of range: {}", value)))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Mark, E>
            where
                E: de::Error,
            {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("mark ordinal out of range: {}", value)))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E>(self, value: &str) -> Result<Mark, E>
            where
                E: de::Error,
            {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MarkVisitor)
    }
}

/// Composite key of the mark store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkKey {
    pub card: String,
    pub player: PlayerId,
}

impl MarkKey {
    pub fn new(card: impl Into<String>, player: PlayerId) -> Self {
        Self {
            card: card.into(),
            player,
        }
    }
}

/// `"<cardId>:<playerId>"`
impl fmt::Display for MarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.card, self.player)
    }
}

impl FromStr for MarkKey {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Card ids never contain ':', the player id is always the last segment
        let (card, player) = s
            .rsplit_once(':')
            .ok_or_else(|| LookupError::InvalidMarkKey(s.to_string()))?;
        if card.is_empty() {
            return Err(LookupError::InvalidMarkKey(s.to_string()));
        }
        let player = player
            .parse()
            .map_err(|_| LookupError::InvalidMarkKey(s.to_string()))?;
        Ok(Self::new(card, player))
    }
}

/// Sparse mapping from (card, player) to a mark
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkStore {
    marks: HashMap<MarkKey, Mark>,
}

impl MarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored mark, or `Unknown` when the pair was never marked
    pub fn get(&self, card_id: &str, player: PlayerId) -> Mark {
        self.marks
            .get(&MarkKey::new(card_id, player))
            .copied()
            .unwrap_or_default()
    }

    /// Overwrites the mark for a pair. Card and player are not validated.
    pub fn set(&mut self, card_id: &str, player: PlayerId, mark: Mark) {
        let key = MarkKey::new(card_id, player);
        if mark.is_unknown() {
            self.marks.remove(&key);
        } else {
            self.marks.insert(key, mark);
        }
    }

    /// Clears every stored mark
    pub fn reset_all(&mut self) {
        self.marks.clear();
    }

    /// Number of explicitly marked pairs, orphans included
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Iterates over every stored entry in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&MarkKey, Mark)> {
        self.marks.iter().map(|(k, m)| (k, *m))
    }

    /// Highest player id referenced by any entry
    pub fn max_player_id(&self) -> Option<PlayerId> {
        self.marks.keys().map(|k| k.player).max()
    }
}

impl FromIterator<(MarkKey, Mark)> for MarkStore {
    fn from_iter<I: IntoIterator<Item = (MarkKey, Mark)>>(iter: I) -> Self {
        let mut store = MarkStore::new();
        for (key, mark) in iter {
            store.set(&key.card, key.player, mark);
        }
        store
    }
}
