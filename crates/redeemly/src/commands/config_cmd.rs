//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Input, Select};

use redeemly_core::model::validate_limit;
use redeemly_core::{DisplayOrder, MAX_LIMIT, MIN_LIMIT};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{self, Config, Context};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# cannot render config: {e}"))
}

fn save(cfg: &Config, quiet: bool) -> Result<(), CliError> {
    config::save_config(cfg)?;
    if !quiet {
        eprintln!("Saved {}", config::config_path().display());
    }
    Ok(())
}

fn checked_limit(limit: u32) -> Result<u32, CliError> {
    validate_limit(limit).map_err(|_| CliError::Validation {
        field: "limit".into(),
        reason: format!("must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"),
    })
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init_wizard(ctx: &Context) -> Result<Config, CliError> {
    let mut cfg = ctx.config.clone();
    eprintln!("redeemly configuration");
    eprintln!("   Config path: {}\n", config::config_path().display());

    // 1. Ledger file
    let ledger: String = Input::new()
        .with_prompt("Ledger file")
        .default(ctx.ledger_path().display().to_string())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.ledger = Some(PathBuf::from(ledger.trim()));

    // 2. Default limit (empty = ask for every new barcode)
    let limit: String = Input::new()
        .with_prompt(format!(
            "Default limit for new barcodes ({MIN_LIMIT}-{MAX_LIMIT}, empty to ask each time)"
        ))
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), String> {
            let input = input.trim();
            if input.is_empty() {
                return Ok(());
            }
            match input.parse::<u32>() {
                Ok(n) if validate_limit(n).is_ok() => Ok(()),
                _ => Err(format!("enter a whole number in {MIN_LIMIT}-{MAX_LIMIT}")),
            }
        })
        .interact_text()
        .map_err(prompt_err)?;
    cfg.defaults.limit = match limit.trim() {
        "" => None,
        n => Some(n.parse().map_err(prompt_err)?),
    };

    // 3. Recent window
    cfg.defaults.recent = Input::new()
        .with_prompt("Rows shown by `recent`")
        .default(cfg.defaults.recent)
        .validate_with(|n: &usize| -> Result<(), &str> {
            if *n == 0 { Err("must be at least 1") } else { Ok(()) }
        })
        .interact_text()
        .map_err(prompt_err)?;

    // 4. Display order
    let orders = [DisplayOrder::OldestFirst, DisplayOrder::NewestFirst];
    let selected = Select::new()
        .with_prompt("Recent entries order")
        .items(&["oldest first (newest at the bottom)", "newest first"])
        .default(usize::from(cfg.defaults.order == DisplayOrder::NewestFirst))
        .interact()
        .map_err(prompt_err)?;
    cfg.defaults.order = orders.get(selected).copied().unwrap_or_default();

    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            if !ctx.interactive {
                return Err(CliError::Interaction {
                    message: "config init needs a terminal; use set-limit / set-ledger instead"
                        .into(),
                });
            }
            let cfg = init_wizard(ctx)?;
            save(&cfg, ctx.quiet)
        }

        ConfigCommand::Show => {
            let out = output::render_single(ctx.output, &ctx.config, format_config, |c| {
                c.ledger_path().display().to_string()
            });
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), ctx.quiet);
            Ok(())
        }

        ConfigCommand::SetLimit { limit, clear } => {
            let mut cfg = ctx.config.clone();
            cfg.defaults.limit = if clear {
                None
            } else {
                limit.map(checked_limit).transpose()?
            };
            save(&cfg, ctx.quiet)
        }

        ConfigCommand::SetLedger { path } => {
            let mut cfg = ctx.config.clone();
            cfg.ledger = Some(std::path::absolute(&path).unwrap_or(path));
            save(&cfg, ctx.quiet)
        }
    }
}
