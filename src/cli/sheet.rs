//! Sheet commands (cards, grid, marks, report, reset)

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::app::{resolve_player, Context};
use crate::domain::{Card, Catalog, Category, Classification, Mark, Player, SummaryEntry};

/// Width of the card-name column in the grid
const NAME_WIDTH: usize = 18;

/// Width of a player column in the grid
const CELL_WIDTH: usize = 8;

fn categories(filter: Option<Category>) -> Vec<Category> {
    match filter {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    }
}

/// Pads or truncates to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

/// List the cards of the game
pub fn cards(ctx: &Context, category: Option<Category>) -> Result<()> {
    let cards: Vec<&Card> = Catalog.list(category).collect();

    if ctx.output.is_json() {
        ctx.output.data(&cards);
        return Ok(());
    }

    for category in categories(category) {
        println!("{}:", category.title());
        for card in cards.iter().filter(|c| c.category == category) {
            println!("  {:<14} {} {}", card.id, card.icon, card.name);
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct GridRow {
    card: &'static Card,
    marks: Vec<Mark>,
}

#[derive(Serialize)]
struct Grid<'a> {
    players: &'a [Player],
    rows: Vec<GridRow>,
}

/// Show the deduction grid
pub fn grid(ctx: &Context, category: Option<Category>) -> Result<()> {
    let notebook = ctx.open_notebook();
    let session = notebook.session();
    let players = session.players();

    let rows: Vec<GridRow> = Catalog
        .list(category)
        .map(|card| GridRow {
            card,
            marks: players.iter().map(|p| session.mark(card.id, p.id)).collect(),
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.data(&Grid { players, rows });
        return Ok(());
    }

    let header: String = players
        .iter()
        .map(|p| format!(" {}", fit(&p.name, CELL_WIDTH)))
        .collect();

    for (i, category) in categories(category).into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}{}", fit(category.title(), NAME_WIDTH), header.trim_end());
        println!("{}", "-".repeat(NAME_WIDTH + players.len() * (CELL_WIDTH + 1)));
        for row in rows.iter().filter(|r| r.card.category == category) {
            let cells: String = row
                .marks
                .iter()
                .map(|m| format!(" {}", fit(m.glyph(), CELL_WIDTH)))
                .collect();
            println!("{}{}", fit(row.card.name, NAME_WIDTH), cells.trim_end());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct CellView<'a> {
    card: &'static str,
    player: &'a Player,
    mark: Mark,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous: Option<Mark>,
}

fn print_cell(ctx: &Context, card: &Card, player: &Player, mark: Mark, previous: Option<Mark>) {
    if ctx.output.is_json() {
        ctx.output.data(&CellView {
            card: card.id,
            player,
            mark,
            previous,
        });
        return;
    }

    match previous {
        Some(previous) if previous != mark => {
            println!("{} / {}: {} -> {}", card.name, player.name, previous, mark)
        }
        _ => println!("{} / {}: {}", card.name, player.name, mark),
    }
}

/// Show the mark of one cell
pub fn show_mark(ctx: &Context, card: &str, player: &str) -> Result<()> {
    let notebook = ctx.open_notebook();
    let card = Catalog.resolve(card)?;
    let player = resolve_player(&notebook, player)?;

    print_cell(ctx, card, player, notebook.mark(card.id, player.id), None);
    Ok(())
}

/// Advance a cell one step
pub fn cycle(ctx: &Context, card: &str, player: &str) -> Result<()> {
    let mut notebook = ctx.open_notebook();
    let card = Catalog.resolve(card)?;
    let player = resolve_player(&notebook, player)?.clone();

    let previous = notebook.mark(card.id, player.id);
    let mark = notebook.cycle(card.id, player.id);
    debug!(card = card.id, player = %player.id, %previous, %mark, "cycled cell");

    print_cell(ctx, card, &player, mark, Some(previous));
    ctx.report_save(&notebook);
    Ok(())
}

/// Set a cell to an explicit mark
pub fn set(ctx: &Context, card: &str, player: &str, mark: Mark) -> Result<()> {
    let mut notebook = ctx.open_notebook();
    let card = Catalog.resolve(card)?;
    let player = resolve_player(&notebook, player)?.clone();

    let previous = notebook.mark(card.id, player.id);
    notebook.set(card.id, player.id, mark);
    debug!(card = card.id, player = %player.id, %previous, %mark, "set cell");

    print_cell(ctx, card, &player, mark, Some(previous));
    ctx.report_save(&notebook);
    Ok(())
}

/// Reset a cell to unknown
pub fn clear(ctx: &Context, card: &str, player: &str) -> Result<()> {
    let mut notebook = ctx.open_notebook();
    let card = Catalog.resolve(card)?;
    let player = resolve_player(&notebook, player)?.clone();

    let previous = notebook.mark(card.id, player.id);
    notebook.clear(card.id, player.id);

    print_cell(ctx, card, &player, Mark::Unknown, Some(previous));
    ctx.report_save(&notebook);
    Ok(())
}

fn section_title(class: Classification) -> &'static str {
    match class {
        Classification::Confirmed => "Confirmed",
        Classification::Suspected => "Suspected",
        Classification::Excluded => "Excluded",
        Classification::Unclassified => "Unclassified",
    }
}

fn player_names(entry: &SummaryEntry) -> String {
    entry
        .players
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summarize the sheet
pub fn report(ctx: &Context) -> Result<()> {
    let notebook = ctx.open_notebook();
    let summary = notebook.summarize();

    if ctx.output.is_json() {
        ctx.output.data(&summary);
        return Ok(());
    }

    if summary.is_empty() {
        println!("No marks yet.");
        return Ok(());
    }

    let mut first = true;
    for (class, entries) in summary.sections() {
        if entries.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;

        println!("{} ({}):", section_title(class), entries.len());
        for entry in entries {
            println!("  {} {}: {}", entry.card.icon, entry.card.name, player_names(entry));
        }
    }

    Ok(())
}

/// Clear every mark
pub fn reset(ctx: &Context) -> Result<()> {
    let mut notebook = ctx.open_notebook();
    let cleared = notebook.session().marks().len();
    notebook.reset_all();
    debug!(cleared, "reset sheet");

    if ctx.output.is_json() {
        ctx.output.data(&serde_json::json!({
            "success": true,
            "cleared": cleared,
        }));
    } else {
        ctx.output.success(&format!("Cleared {} marks", cleared));
    }
    ctx.report_save(&notebook);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerId;

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("Ann", 5), "Ann  ");
        assert_eq!(fit("Bartholomew", 5), "Barth");
        assert_eq!(fit("✓", 3), "✓  ");
    }

    #[test]
    fn categories_filter() {
        assert_eq!(categories(Some(Category::Room)), vec![Category::Room]);
        assert_eq!(categories(None).len(), 3);
    }

    #[test]
    fn player_names_are_joined_in_order() {
        let entry = SummaryEntry {
            card: *Catalog.find("rope").unwrap(),
            players: vec![
                Player::new(PlayerId::new(1), "Ann"),
                Player::new(PlayerId::new(3), "Cy"),
            ],
        };
        assert_eq!(player_names(&entry), "Ann, Cy");
    }
}
