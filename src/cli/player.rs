//! Player CLI commands

use anyhow::Result;
use clap::Subcommand;
use tracing::debug;

use super::app::{resolve_player, Context};
use crate::domain::Player;

#[derive(Subcommand)]
pub enum PlayerCommands {
    /// List players in column order
    List,

    /// Add a player at the end of the roster
    ///
    /// Examples:
    ///   clue player add            # named "Player N"
    ///   clue player add "Grace"
    Add {
        /// Display name (defaults to "Player N")
        name: Option<String>,
    },

    /// Remove a player (their marks stop counting)
    Remove {
        /// Player id or name
        player: String,
    },

    /// Rename a player
    Rename {
        /// Player id or name
        player: String,

        /// New display name
        name: String,
    },
}

pub fn run(cmd: PlayerCommands, ctx: &Context) -> Result<()> {
    match cmd {
        PlayerCommands::List => list_players(ctx),
        PlayerCommands::Add { name } => add_player(ctx, name),
        PlayerCommands::Remove { player } => remove_player(ctx, &player),
        PlayerCommands::Rename { player, name } => rename_player(ctx, &player, &name),
    }
}

fn print_player(ctx: &Context, player: &Player, message: &str) {
    if ctx.output.is_json() {
        ctx.output.data(player);
    } else {
        ctx.output.success(message);
    }
}

fn list_players(ctx: &Context) -> Result<()> {
    let notebook = ctx.open_notebook();
    let players = notebook.session().players();

    if ctx.output.is_json() {
        ctx.output.data(&players);
        return Ok(());
    }

    println!("{:<4} NAME", "ID");
    println!("{}", "-".repeat(30));
    for player in players {
        println!("{:<4} {}", player.id, player.name);
    }

    Ok(())
}

fn add_player(ctx: &Context, name: Option<String>) -> Result<()> {
    let mut notebook = ctx.open_notebook();
    let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

    let player = notebook.add_player(name)?;
    debug!(id = %player.id, name = %player.name, "added player");

    print_player(ctx, &player, &format!("Added player {} ({})", player.name, player.id));
    ctx.report_save(&notebook);
    Ok(())
}

fn remove_player(ctx: &Context, query: &str) -> Result<()> {
    let mut notebook = ctx.open_notebook();
    let id = resolve_player(&notebook, query)?.id;

    let player = notebook.remove_player(id)?;
    debug!(id = %player.id, "removed player");

    print_player(ctx, &player, &format!("Removed player {} ({})", player.name, player.id));
    ctx.report_save(&notebook);
    Ok(())
}

fn rename_player(ctx: &Context, query: &str, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Player name cannot be empty");
    }

    let mut notebook = ctx.open_notebook();
    let id = resolve_player(&notebook, query)?.id;

    let player = notebook.rename_player(id, name)?;
    debug!(id = %player.id, name = %player.name, "renamed player");

    print_player(ctx, &player, &format!("Renamed player {} to {}", player.id, player.name));
    ctx.report_save(&notebook);
    Ok(())
}
