//! Auto-saving session
//!
//! A [`Notebook`] pairs a [`Session`] with a [`SnapshotStore`]. Opening it
//! never fails: a missing or unreadable snapshot falls back to a fresh
//! session. Every state-changing call saves afterwards; a failed save is
//! logged and remembered but the in-memory change stands.

use tracing::{debug, error, warn};

use super::snapshot::Snapshot;
use super::store::SnapshotStore;
use crate::domain::{Mark, Player, PlayerId, RosterError, Session, Summary};

/// How the session was obtained when the notebook was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Restored from the store
    Restored,
    /// Nothing saved yet
    Fresh,
    /// Saved state was unreadable or invalid and was ignored
    Recovered,
}

pub struct Notebook<S: SnapshotStore> {
    session: Session,
    store: S,
    loaded: LoadOutcome,
    last_save_error: Option<String>,
}

impl<S: SnapshotStore> Notebook<S> {
    /// Loads the saved session, or starts one with `default_players`
    pub fn open(store: S, default_players: &[String]) -> Self {
        let fresh = || Session::new(default_players.iter().cloned());

        let (session, loaded) = match store.load() {
            Ok(Some(snapshot)) => match snapshot.into_session() {
                Ok(session) => {
                    debug!(players = session.players().len(), marks = session.marks().len(), "restored saved sheet");
                    (session, LoadOutcome::Restored)
                }
                Err(e) => {
                    warn!(error = %e, "ignoring invalid saved sheet");
                    (fresh(), LoadOutcome::Recovered)
                }
            },
            Ok(None) => {
                debug!("no saved sheet, starting fresh");
                (fresh(), LoadOutcome::Fresh)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(error = %message, "could not load saved sheet, starting fresh");
                (fresh(), LoadOutcome::Recovered)
            }
        };

        Self {
            session,
            store,
            loaded,
            last_save_error: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn load_outcome(&self) -> LoadOutcome {
        self.loaded
    }

    /// Message of the most recent failed save, cleared by the next success
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Writes the current session to the store. Failures are logged and
    /// kept in [`last_save_error`](Self::last_save_error), never returned.
    pub fn save(&mut self) {
        let snapshot = Snapshot::capture(&self.session);
        match self.store.save(&snapshot) {
            Ok(()) => {
                debug!(marks = snapshot.marks.len(), "saved sheet");
                self.last_save_error = None;
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(error = %message, "failed to save sheet");
                self.last_save_error = Some(message);
            }
        }
    }

    pub fn mark(&self, card_id: &str, player: PlayerId) -> Mark {
        self.session.mark(card_id, player)
    }

    pub fn cycle(&mut self, card_id: &str, player: PlayerId) -> Mark {
        let mark = self.session.cycle(card_id, player);
        self.save();
        mark
    }

    pub fn set(&mut self, card_id: &str, player: PlayerId, mark: Mark) {
        self.session.set(card_id, player, mark);
        self.save();
    }

    pub fn clear(&mut self, card_id: &str, player: PlayerId) {
        self.session.clear(card_id, player);
        self.save();
    }

    pub fn add_player(&mut self, name: Option<String>) -> Result<Player, RosterError> {
        let player = self.session.add_player(name)?;
        self.save();
        Ok(player)
    }

    /// Rejected edits are not saved since nothing changed
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, RosterError> {
        let player = self.session.remove_player(id)?;
        self.save();
        Ok(player)
    }

    pub fn rename_player(&mut self, id: PlayerId, name: impl Into<String>) -> Result<Player, RosterError> {
        let player = self.session.rename_player(id, name)?.clone();
        self.save();
        Ok(player)
    }

    pub fn reset_all(&mut self) {
        self.session.reset_all();
        self.save();
    }

    pub fn summarize(&self) -> Summary {
        self.session.summarize()
    }
}
