//! Players and the roster
//!
//! The roster is the ordered list of columns on the sheet. Player ids are
//! small positive integers allocated monotonically; the roster remembers the
//! highest id it ever handed out so a removed player's id is not reused
//! within the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by roster edits. The roster is left untouched on error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("Cannot remove the last remaining player")]
    InvariantViolation,

    #[error("Player not found: {0}")]
    NotFound(PlayerId),

    #[error("No player ids left to allocate")]
    IdsExhausted,
}

/// Stable player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Largest id the roster will ever allocate
    pub const MAX: PlayerId = PlayerId(u32::MAX);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A column of the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(alias = "displayName")]
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Column names of a fresh sheet
pub const DEFAULT_PLAYERS: [&str; 3] = ["You", "Player 2", "Player 3"];

/// Ordered list of players
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    players: Vec<Player>,
    /// Highest id ever allocated in this session
    high_water: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::numbered(DEFAULT_PLAYERS)
    }
}

impl Roster {
    /// Numbers `names` 1..=n
    fn numbered<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players: Vec<Player> = (1u32..)
            .zip(names)
            .map(|(id, name)| Player::new(PlayerId(id), name))
            .collect();
        let high_water = players.last().map_or(0, |p| p.id.get());
        Self { players, high_water }
    }

    /// Builds a roster from names, assigning ids 1..=n.
    ///
    /// Returns `None` for an empty name list, since a roster always holds at
    /// least one player.
    pub fn with_names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roster = Self::numbered(names);
        (!roster.players.is_empty()).then_some(roster)
    }

    /// Rebuilds a roster from persisted players.
    ///
    /// `high_water` is raised to at least the largest live id. Returns `None`
    /// when `players` is empty, contains a duplicate id or the id 0.
    pub fn from_players(players: Vec<Player>, high_water: u32) -> Option<Self> {
        if players.is_empty() || players.iter().any(|p| p.id.get() == 0) {
            return None;
        }
        let mut ids: Vec<_> = players.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        if ids.len() != players.len() {
            return None;
        }
        let max_live = ids.last().map_or(0, PlayerId::get);
        Some(Self {
            players,
            high_water: high_water.max(max_live),
        })
    }

    /// Appends a new player with a freshly allocated id
    pub fn add(&mut self, name: impl Into<String>) -> Result<Player, RosterError> {
        let max_live = self.players.iter().map(|p| p.id.get()).max().unwrap_or(0);
        let next = self
            .high_water
            .max(max_live)
            .checked_add(1)
            .ok_or(RosterError::IdsExhausted)?;
        let id = PlayerId(next);
        self.high_water = next;

        let player = Player::new(id, name);
        self.players.push(player.clone());
        Ok(player)
    }

    /// Removes a player by id, refusing to empty the roster
    pub fn remove(&mut self, id: PlayerId) -> Result<Player, RosterError> {
        if self.players.len() <= 1 {
            return Err(RosterError::InvariantViolation);
        }
        let index = self.index_of(id).ok_or(RosterError::NotFound(id))?;
        Ok(self.players.remove(index))
    }

    /// Renames a player in place
    pub fn rename(&mut self, id: PlayerId, name: impl Into<String>) -> Result<&Player, RosterError> {
        let index = self.index_of(id).ok_or(RosterError::NotFound(id))?;
        let player = &mut self.players[index];
        player.name = name.into();
        Ok(player)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Resolves user input to a player: numeric id first, then name
    /// (case-insensitive)
    pub fn resolve(&self, query: &str) -> Option<&Player> {
        let needle = query.trim();
        needle
            .parse::<PlayerId>()
            .ok()
            .and_then(|id| self.get(id))
            .or_else(|| self.players.iter().find(|p| p.name.eq_ignore_ascii_case(needle)))
    }

    /// Players in insertion order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn high_water(&self) -> u32 {
        self.high_water
    }

    /// Raises the high-water mark, e.g. to cover ids only seen in orphaned
    /// marks
    pub fn reserve_through(&mut self, id: PlayerId) {
        self.high_water = self.high_water.max(id.get());
    }

    fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        Roster::with_names(names.iter().copied()).unwrap()
    }

    #[test]
    fn with_names_assigns_sequential_ids() {
        let r = roster(&["You", "Player 2", "Player 3"]);
        let ids: Vec<_> = r.players().iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(r.high_water(), 3);
    }

    #[test]
    fn empty_roster_is_rejected() {
        assert!(Roster::with_names(Vec::<String>::new()).is_none());
        assert!(Roster::from_players(vec![], 5).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let players = vec![
            Player::new(PlayerId::new(1), "A"),
            Player::new(PlayerId::new(1), "B"),
        ];
        assert!(Roster::from_players(players, 0).is_none());
    }

    #[test]
    fn add_appends_with_next_id() {
        let mut r = roster(&["A", "B"]);
        let c = r.add("C").unwrap();
        assert_eq!(c.id, PlayerId::new(3));
        assert_eq!(r.players().last().unwrap().name, "C");
    }

    #[test]
    fn removed_ids_are_not_recycled() {
        let mut r = roster(&["A", "B", "C"]);
        r.remove(PlayerId::new(3)).unwrap();
        let d = r.add("D").unwrap();
        assert_eq!(d.id, PlayerId::new(4));
    }

    #[test]
    fn from_players_raises_high_water_to_live_max() {
        let players = vec![
            Player::new(PlayerId::new(2), "A"),
            Player::new(PlayerId::new(7), "B"),
        ];
        let mut r = Roster::from_players(players, 0).unwrap();
        assert_eq!(r.add("C").unwrap().id, PlayerId::new(8));
    }

    #[test]
    fn zero_id_is_rejected() {
        let players = vec![
            Player::new(PlayerId::new(0), "A"),
            Player::new(PlayerId::new(1), "B"),
        ];
        assert!(Roster::from_players(players, 1).is_none());
    }

    #[test]
    fn add_fails_once_ids_run_out() {
        let mut r = roster(&["A"]);
        r.reserve_through(PlayerId::MAX);

        assert_eq!(r.add("B"), Err(RosterError::IdsExhausted));
        assert_eq!(r.len(), 1);
        assert_eq!(r.high_water(), u32::MAX);
    }

    #[test]
    fn last_id_can_still_be_allocated() {
        let mut r = roster(&["A"]);
        r.reserve_through(PlayerId::new(u32::MAX - 1));
        assert_eq!(r.add("B").unwrap().id, PlayerId::MAX);
        assert_eq!(r.add("C"), Err(RosterError::IdsExhausted));
    }

    #[test]
    fn cannot_remove_last_player() {
        let mut r = roster(&["Solo"]);
        assert_eq!(r.remove(PlayerId::new(1)), Err(RosterError::InvariantViolation));
        assert_eq!(r.len(), 1);
        assert_eq!(r.players()[0].name, "Solo");
    }

    #[test]
    fn floor_is_checked_before_existence() {
        let mut r = roster(&["Solo"]);
        assert_eq!(r.remove(PlayerId::new(42)), Err(RosterError::InvariantViolation));
    }

    #[test]
    fn remove_missing_player() {
        let mut r = roster(&["A", "B"]);
        assert_eq!(
            r.remove(PlayerId::new(9)),
            Err(RosterError::NotFound(PlayerId::new(9)))
        );
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn rename_preserves_id_and_position() {
        let mut r = roster(&["A", "B", "C"]);
        r.rename(PlayerId::new(2), "Bea").unwrap();
        assert_eq!(r.players()[1], Player::new(PlayerId::new(2), "Bea"));
        assert_eq!(
            r.rename(PlayerId::new(5), "X").unwrap_err(),
            RosterError::NotFound(PlayerId::new(5))
        );
    }

    #[test]
    fn resolve_by_id_or_name() {
        let r = roster(&["Alice", "Bob"]);
        assert_eq!(r.resolve("2").unwrap().name, "Bob");
        assert_eq!(r.resolve("alice").unwrap().id, PlayerId::new(1));
        assert!(r.resolve("Carol").is_none());
    }

    #[test]
    fn player_accepts_display_name_alias() {
        let p: Player = serde_json::from_str(r#"{"id": 4, "displayName": "Dana"}"#).unwrap();
        assert_eq!(p, Player::new(PlayerId::new(4), "Dana"));
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"id":4,"name":"Dana"}"#
        );
    }
}
