//! Summary derivation
//!
//! Classifies every card from the live roster's marks. A single `Yes` is
//! authoritative: priority is fixed at Confirmed > Suspected > Excluded, and
//! cards nobody has marked are left out of the report.
//!
//! Marks held by removed players are never consulted because only the live
//! roster is iterated.

use serde::Serialize;

use super::card::{Card, Catalog};
use super::mark::{Mark, MarkStore};
use super::player::{Player, Roster};

/// Report bucket of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Confirmed,
    Suspected,
    Excluded,
    Unclassified,
}

impl Classification {
    /// Mark that places a card in this bucket
    fn from_mark(mark: Mark) -> Classification {
        match mark {
            Mark::Yes => Classification::Confirmed,
            Mark::Maybe => Classification::Suspected,
            Mark::No => Classification::Excluded,
            Mark::Unknown => Classification::Unclassified,
        }
    }
}

/// One card of a report bucket with the players responsible for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub card: Card,
    pub players: Vec<Player>,
}

/// Cards grouped by classification, each list in catalog order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub confirmed: Vec<SummaryEntry>,
    pub suspected: Vec<SummaryEntry>,
    pub excluded: Vec<SummaryEntry>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.suspected.is_empty() && self.excluded.is_empty()
    }

    /// Buckets with their classification, in priority order
    pub fn sections(&self) -> [(Classification, &[SummaryEntry]); 3] {
        [
            (Classification::Confirmed, self.confirmed.as_slice()),
            (Classification::Suspected, self.suspected.as_slice()),
            (Classification::Excluded, self.excluded.as_slice()),
        ]
    }

    /// Finds the bucket a card landed in
    #[cfg(test)]
    pub fn classification_of(&self, card_id: &str) -> Classification {
        self.sections()
            .into_iter()
            .find(|(_, entries)| entries.iter().any(|e| e.card.id == card_id))
            .map_or(Classification::Unclassified, |(class, _)| class)
    }
}

/// Classifies a single card, returning the responsible players in roster
/// order. The player list is empty for `Unclassified`.
pub fn classify(card: &Card, roster: &Roster, marks: &MarkStore) -> (Classification, Vec<Player>) {
    let cells: Vec<(&Player, Mark)> = roster
        .players()
        .iter()
        .map(|p| (p, marks.get(card.id, p.id)))
        .collect();

    let strongest = cells.iter().map(|(_, m)| *m).max().unwrap_or_default();
    if strongest.is_unknown() {
        return (Classification::Unclassified, Vec::new());
    }

    let responsible = cells
        .into_iter()
        .filter(|(_, m)| *m == strongest)
        .map(|(p, _)| p.clone())
        .collect();

    (Classification::from_mark(strongest), responsible)
}

/// Derives the full report from the catalog, roster and marks
pub fn summarize(catalog: &Catalog, roster: &Roster, marks: &MarkStore) -> Summary {
    let mut summary = Summary::default();

    for card in catalog.cards() {
        let (class, players) = classify(card, roster, marks);
        let entry = SummaryEntry {
            card: *card,
            players,
        };
        match class {
            Classification::Confirmed => summary.confirmed.push(entry),
            Classification::Suspected => summary.suspected.push(entry),
            Classification::Excluded => summary.excluded.push(entry),
            Classification::Unclassified => {}
        }
    }

    summary
}
