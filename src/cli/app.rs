//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::{logging, player, sheet};
use crate::domain::{Category, LookupError, Mark, Player};
use crate::storage::{Config, JsonFileStore, LoadOutcome, Notebook};

#[derive(Parser)]
#[command(name = "clue")]
#[command(author, version, about = "Deduction sheet for Cluedo-style games")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path of the saved sheet
    #[arg(long, global = true, env = "CLUE_STATE")]
    pub state: Option<PathBuf>,

    /// Path of the configuration file
    #[arg(long, global = true, env = "CLUE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the cards of the game
    Cards {
        /// Only show one category (suspect, weapon, room)
        #[arg(long, short)]
        category: Option<Category>,
    },

    /// Show the deduction grid
    Grid {
        /// Only show one category (suspect, weapon, room)
        #[arg(long, short)]
        category: Option<Category>,
    },

    /// Show the mark of one cell
    Mark {
        /// Card id or name
        card: String,

        /// Player id or name
        player: String,
    },

    /// Advance a cell to its next mark (unknown, no, maybe, yes)
    Cycle {
        /// Card id or name
        card: String,

        /// Player id or name
        player: String,
    },

    /// Set a cell to a specific mark
    Set {
        /// Card id or name
        card: String,

        /// Player id or name
        player: String,

        /// yes, no, maybe or unknown
        mark: Mark,
    },

    /// Reset a cell to unknown
    Clear {
        /// Card id or name
        card: String,

        /// Player id or name
        player: String,
    },

    /// Summarize confirmed, suspected and excluded cards
    Report,

    /// Clear every mark (players are kept)
    Reset,

    /// Manage players
    #[command(subcommand)]
    Player(player::PlayerCommands),
}

/// Shared state for one CLI invocation
pub struct Context {
    pub output: Output,
    pub config: Config,
    pub state_path: PathBuf,
}

impl Context {
    /// Opens the saved sheet, falling back to a fresh one
    pub fn open_notebook(&self) -> Notebook<JsonFileStore> {
        let notebook = Notebook::open(
            JsonFileStore::new(&self.state_path),
            &self.config.default_players,
        );
        if notebook.load_outcome() == LoadOutcome::Recovered {
            self.output.warn(&format!(
                "saved sheet at {} could not be read; starting a fresh sheet",
                self.state_path.display()
            ));
        }
        notebook
    }

    /// Surfaces a failed save without failing the command
    pub fn report_save(&self, notebook: &Notebook<JsonFileStore>) {
        if let Some(err) = notebook.last_save_error() {
            self.output.warn(&format!("changes were not saved: {}", err));
        }
    }
}

/// Resolves a player argument against the live roster
pub fn resolve_player<'a>(notebook: &'a Notebook<JsonFileStore>, query: &str) -> Result<&'a Player> {
    notebook
        .session()
        .roster()
        .resolve(query)
        .ok_or_else(|| LookupError::UnknownPlayer(query.to_string()).into())
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    logging::init(cli.verbose, config.level());

    let format = cli
        .format
        .unwrap_or_else(|| config.default_format.into());
    let state_path = config.state_path(cli.state)?;
    debug!(path = %state_path.display(), "using saved sheet");

    let ctx = Context {
        output: Output::new(format),
        config,
        state_path,
    };

    match cli.command {
        Commands::Cards { category } => sheet::cards(&ctx, category),
        Commands::Grid { category } => sheet::grid(&ctx, category),
        Commands::Mark { card, player } => sheet::show_mark(&ctx, &card, &player),
        Commands::Cycle { card, player } => sheet::cycle(&ctx, &card, &player),
        Commands::Set { card, player, mark } => sheet::set(&ctx, &card, &player, mark),
        Commands::Clear { card, player } => sheet::clear(&ctx, &card, &player),
        Commands::Report => sheet::report(&ctx),
        Commands::Reset => sheet::reset(&ctx),
        Commands::Player(cmd) => player::run(cmd, &ctx),
    }
}
