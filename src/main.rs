//! Clue Sheet - deduction sheet for Cluedo-style games

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = clue_sheet::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
