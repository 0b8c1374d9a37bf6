mod cli;
mod commands;
mod config;
mod error;
mod interact;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Context;
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    if let Command::Completions(args) = &cli.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "redeemly", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        // Config commands must still work when the file is broken.
        Err(err) if matches!(cli.command, Command::Config(_)) => {
            tracing::warn!(error = %err, "config unreadable, using defaults");
            config::Config::default()
        }
        Err(err) => return Err(err.into()),
    };
    let ctx = Context::resolve(&cli.global, cfg);

    tracing::debug!(command = ?cli.command, ledger = %ctx.ledger_path().display(), "dispatching command");
    commands::dispatch(cli.command, &ctx)
}
