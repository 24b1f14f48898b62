//! Deduction session
//!
//! Owns the roster and the mark store for one game. Presentation code talks
//! to the session only; it never edits the roster or the store directly.

use super::card::Catalog;
use super::mark::{Mark, MarkStore};
use super::player::{Player, PlayerId, Roster, RosterError};
use super::summary::{self, Summary};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    catalog: Catalog,
    roster: Roster,
    marks: MarkStore,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_parts(Roster::default(), MarkStore::new())
    }
}

impl Session {
    /// Starts a session with the given column names and no marks. Falls back
    /// to the default roster when `names` is empty.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match Roster::with_names(names) {
            Some(roster) => Self::from_parts(roster, MarkStore::new()),
            None => Self::default(),
        }
    }

    /// Assembles a session from restored state.
    ///
    /// Ids referenced only by orphaned marks are reserved so a new player
    /// never inherits them.
    pub fn from_parts(mut roster: Roster, marks: MarkStore) -> Self {
        if let Some(max) = marks.max_player_id() {
            roster.reserve_through(max);
        }
        Self {
            catalog: Catalog,
            roster,
            marks,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn marks(&self) -> &MarkStore {
        &self.marks
    }

    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    /// Current mark of a cell
    pub fn mark(&self, card_id: &str, player: PlayerId) -> Mark {
        self.marks.get(card_id, player)
    }

    /// Advances a cell one step through the cycle and returns the new mark
    pub fn cycle(&mut self, card_id: &str, player: PlayerId) -> Mark {
        let next = self.marks.get(card_id, player).next();
        self.marks.set(card_id, player, next);
        next
    }

    /// Sets a cell to an explicit mark
    pub fn set(&mut self, card_id: &str, player: PlayerId, mark: Mark) {
        self.marks.set(card_id, player, mark);
    }

    /// Sets a cell back to `Unknown`
    pub fn clear(&mut self, card_id: &str, player: PlayerId) {
        self.marks.set(card_id, player, Mark::Unknown);
    }

    /// Adds a player; `None` picks the default `Player N` name
    pub fn add_player(&mut self, name: Option<String>) -> Result<Player, RosterError> {
        let name = name.unwrap_or_else(|| format!("Player {}", self.roster.len() + 1));
        self.roster.add(name)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, RosterError> {
        self.roster.remove(id)
    }

    pub fn rename_player(&mut self, id: PlayerId, name: impl Into<String>) -> Result<&Player, RosterError> {
        self.roster.rename(id, name)
    }

    /// Clears every mark; the roster is kept
    pub fn reset_all(&mut self) {
        self.marks.reset_all();
    }

    /// Recomputes the report from the current state
    pub fn summarize(&self) -> Summary {
        summary::summarize(&self.catalog, &self.roster, &self.marks)
    }
}
