//! # Command-Line Interface
//!
//! User-facing commands over a saved deduction sheet.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Catalog | Browse cards | `cards`, `cards --category room` |
//! | Sheet | Read and mark cells | `grid`, `mark`, `cycle`, `set`, `clear` |
//! | Report | Derived summary | `report` |
//! | Players | Roster management | `player add`, `player rename`, `player remove` |
//! | Game | Start over | `reset` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod logging;
mod output;
mod player;
mod sheet;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
