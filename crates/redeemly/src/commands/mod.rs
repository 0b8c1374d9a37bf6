//! Command dispatch: bridges CLI args -> core Session -> output formatting.

pub mod config_cmd;
pub mod delete;
pub mod ledger;
pub mod recent;
pub mod register;
pub mod scan;
pub mod search;
pub mod util;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a ledger-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Register(args) => register::handle(&args, ctx),
        Command::Scan(args) => scan::handle(&args, ctx),
        Command::Search(args) => search::handle(&args, ctx),
        Command::Delete(args) => delete::handle(&args, ctx),
        Command::Recent(args) => recent::handle(&args, ctx),
        Command::Ledger(args) => ledger::handle(args, ctx),
        Command::Config(args) => config_cmd::handle(args, ctx),
        // Completions never reach dispatch
        Command::Completions(_) => Ok(()),
    }
}
