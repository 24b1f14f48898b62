//! Card catalog
//!
//! The fixed universe of cards: six suspects, six weapons and nine rooms.
//! Declaration order is the display order everywhere (grid rows, report
//! entries), so the tables below are the single source of ordering.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::LookupError;

/// Card category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Suspect,
    Weapon,
    Room,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 3] = [Category::Suspect, Category::Weapon, Category::Room];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Suspect => "suspect",
            Category::Weapon => "weapon",
            Category::Room => "room",
        }
    }

    /// Section heading used when rendering the grid
    pub fn title(&self) -> &'static str {
        match self {
            Category::Suspect => "Suspects",
            Category::Weapon => "Weapons",
            Category::Room => "Rooms",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suspect" | "suspects" => Ok(Category::Suspect),
            "weapon" | "weapons" => Ok(Category::Weapon),
            "room" | "rooms" => Ok(Category::Room),
            _ => Err(LookupError::UnknownCategory(s.to_string())),
        }
    }
}

/// A single card of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    /// Stable identifier, unique across the whole catalog
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub category: Category,
    /// Emoji for weapons and rooms, colour dot for suspects
    pub icon: &'static str,
    /// Name the card had on sheets saved by the Turkish edition
    #[serde(skip)]
    pub alias: &'static str,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

const fn card(
    id: &'static str,
    name: &'static str,
    alias: &'static str,
    category: Category,
    icon: &'static str,
) -> Card {
    Card {
        id,
        name,
        category,
        icon,
        alias,
    }
}

static CARDS: [Card; 21] = [
    card("green", "Reverend Green", "Başkan Green", Category::Suspect, "🟢"),
    card("mustard", "Colonel Mustard", "Albay Mustard", Category::Suspect, "🟡"),
    card("white", "Mrs. White", "Şef White", Category::Suspect, "⚪"),
    card("peacock", "Mrs. Peacock", "Avukat Peacock", Category::Suspect, "🔵"),
    card("plum", "Professor Plum", "Profesör Plum", Category::Suspect, "🟣"),
    card("scarlett", "Miss Scarlett", "Bayan Scarlett", Category::Suspect, "🔴"),
    card("candlestick", "Candlestick", "Şamdan", Category::Weapon, "🕯️"),
    card("dagger", "Dagger", "Hançer", Category::Weapon, "🗡️"),
    card("revolver", "Revolver", "Tabanca", Category::Weapon, "🔫"),
    card("lead-pipe", "Lead Pipe", "Kurşun Boru", Category::Weapon, "🔩"),
    card("rope", "Rope", "İp", Category::Weapon, "🪢"),
    card("wrench", "Wrench", "İngiliz Anahtarı", Category::Weapon, "🔧"),
    card("ballroom", "Ballroom", "Balo Salonu", Category::Room, "💃"),
    card("billiard-room", "Billiard Room", "Bilardo Odası", Category::Room, "🎱"),
    card("conservatory", "Conservatory", "Kış Bahçesi", Category::Room, "🌿"),
    card("dining-room", "Dining Room", "Yemek Odası", Category::Room, "🍽️"),
    card("hall", "Hall", "Hol", Category::Room, "🚪"),
    card("kitchen", "Kitchen", "Mutfak", Category::Room, "🍳"),
    card("library", "Library", "Kütüphane", Category::Room, "📚"),
    card("lounge", "Lounge", "Salon", Category::Room, "🛋️"),
    card("study", "Study", "Çalışma Odası", Category::Room, "💼"),
];

/// Read-only view over the static card table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Catalog;

impl Catalog {
    /// Every card in declaration order
    pub fn cards(&self) -> &'static [Card] {
        &CARDS
    }

    /// Cards in declaration order, optionally restricted to one category
    pub fn list(&self, category: Option<Category>) -> impl Iterator<Item = &'static Card> {
        CARDS
            .iter()
            .filter(move |c| category.map_or(true, |cat| c.category == cat))
    }

    /// Finds a card by its exact id
    pub fn find(&self, id: &str) -> Option<&'static Card> {
        CARDS.iter().find(|c| c.id == id)
    }

    /// Resolves user input to a card: id first, then display name, then the
    /// Turkish name. Matching ignores ASCII case.
    pub fn resolve(&self, query: &str) -> Result<&'static Card, LookupError> {
        let needle = query.trim();
        CARDS
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(needle))
            .or_else(|| CARDS.iter().find(|c| c.name.eq_ignore_ascii_case(needle)))
            .or_else(|| CARDS.iter().find(|c| c.alias.eq_ignore_ascii_case(needle)))
            .ok_or_else(|| LookupError::UnknownCard(query.to_string()))
    }

    pub fn len(&self) -> usize {
        CARDS.len()
    }

    pub fn is_empty(&self) -> bool {
        CARDS.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = Catalog.cards().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), Catalog.len());
    }

    #[test]
    fn category_counts() {
        assert_eq!(Catalog.list(Some(Category::Suspect)).count(), 6);
        assert_eq!(Catalog.list(Some(Category::Weapon)).count(), 6);
        assert_eq!(Catalog.list(Some(Category::Room)).count(), 9);
        assert_eq!(Catalog.list(None).count(), 21);
    }

    #[test]
    fn list_preserves_declaration_order() {
        let weapons: Vec<_> = Catalog.list(Some(Category::Weapon)).map(|c| c.id).collect();
        assert_eq!(
            weapons,
            vec!["candlestick", "dagger", "revolver", "lead-pipe", "rope", "wrench"]
        );
    }

    #[test]
    fn resolve_by_id_or_name() {
        assert_eq!(Catalog.resolve("lead-pipe").unwrap().name, "Lead Pipe");
        assert_eq!(Catalog.resolve("lead pipe").unwrap().id, "lead-pipe");
        assert_eq!(Catalog.resolve("  LIBRARY ").unwrap().id, "library");
        assert!(matches!(
            Catalog.resolve("spanner"),
            Err(LookupError::UnknownCard(_))
        ));
    }

    #[test]
    fn resolve_turkish_names() {
        assert_eq!(Catalog.resolve("Tabanca").unwrap().id, "revolver");
        assert_eq!(Catalog.resolve("Kütüphane").unwrap().id, "library");
        assert_eq!(Catalog.resolve("Çalışma Odası").unwrap().id, "study");
        assert_eq!(Catalog.resolve("hol").unwrap().id, "hall");
    }

    #[test]
    fn aliases_are_unique() {
        let aliases: HashSet<_> = Catalog.cards().iter().map(|c| c.alias).collect();
        assert_eq!(aliases.len(), Catalog.len());
    }

    #[test]
    fn parse_category() {
        assert_eq!("Rooms".parse::<Category>().unwrap(), Category::Room);
        assert!("cards".parse::<Category>().is_err());
    }
}
