//! Domain models for the deduction sheet
//!
//! Contains the core logic without any I/O concerns.

mod card;
mod mark;
mod player;
mod session;
mod summary;

use thiserror::Error;

pub use card::{Card, Catalog, Category};
pub use mark::{Mark, MarkKey, MarkStore};
pub use player::{Player, PlayerId, Roster, RosterError, DEFAULT_PLAYERS};
pub use session::Session;
pub use summary::{classify, summarize, Classification, Summary, SummaryEntry};

/// Errors raised when user input does not name a known card, player or mark
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Unknown card: '{0}'")]
    UnknownCard(String),

    #[error("Unknown category: '{0}' (expected suspect, weapon or room)")]
    UnknownCategory(String),

    #[error("Unknown player: '{0}'")]
    UnknownPlayer(String),

    #[error("Invalid mark: '{0}' (expected yes, no, maybe or unknown)")]
    InvalidMark(String),

    #[error("Invalid mark key: '{0}' (expected '<card>:<player>')")]
    InvalidMarkKey(String),
}
