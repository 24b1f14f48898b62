//! Clue Sheet - a deduction sheet for Cluedo-style games
//!
//! Each player of the sheet is a column and each card a row. Cells hold a
//! belief (unknown, no, maybe, yes); the summary engine folds the grid into
//! confirmed, suspected and excluded cards.

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{Card, Category, Mark, Player, PlayerId, Session, Summary};
