//! CLI configuration — thin wrapper around `redeemly_config` shared types.
//!
//! Resolves the config file against `GlobalOpts` flag overrides
//! (--ledger, --output, --color) into the context every handler gets.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::ValueEnum;

use redeemly_core::{RecentOptions, Session};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::interact::TerminalOperator;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use redeemly_config::{Config, config_path, load_config, save_config};

// ── Resolved context ────────────────────────────────────────────────

/// Everything a command handler needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
    /// Stdin is a terminal, so prompts can be shown.
    pub interactive: bool,
    ledger_override: Option<PathBuf>,
}

impl Context {
    /// Flag > env > config file > built-in default.
    pub fn resolve(global: &GlobalOpts, config: Config) -> Self {
        let output = global
            .output
            .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);

        Self {
            output,
            color: output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
            interactive: io::stdin().is_terminal(),
            ledger_override: global.ledger.clone(),
            config,
        }
    }

    /// The ledger this invocation works on.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_override
            .clone()
            .unwrap_or_else(|| self.config.ledger_path())
    }

    pub fn recent_options(&self) -> RecentOptions {
        self.config.recent_options()
    }

    /// Open the active ledger, creating it if needed.
    pub fn open_session(&self) -> Result<Session, CliError> {
        self.open_session_at(self.ledger_path())
    }

    /// Open `ledger` with the configured settings, leaving the active
    /// ledger untouched.
    pub fn open_session_at(&self, ledger: PathBuf) -> Result<Session, CliError> {
        let mut settings = self.config.session_settings()?;
        settings.ledger = ledger;
        let path = settings.ledger.display().to_string();
        Session::open(settings).map_err(|e| match e {
            redeemly_core::CoreError::Validation { message } => CliError::Validation {
                field: "defaults.limit".into(),
                reason: message,
            },
            other => CliError::LedgerUnavailable {
                path,
                reason: other.to_string(),
            },
        })
    }

    pub fn operator(&self) -> TerminalOperator {
        TerminalOperator::new(self.interactive, self.yes, self.quiet, self.color)
    }
}
