//! Clap derive structures for the `redeemly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap + clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// redeemly -- barcode coupon redemption ledger
#[derive(Debug, Parser)]
#[command(
    name = "redeemly",
    version,
    about = "Track barcode coupon redemptions in a spreadsheet ledger",
    long_about = "Records every use of a barcode coupon in an .xlsx ledger.\n\n\
        Each barcode gets a redemption limit on first use; later uses are\n\
        numbered and tagged until the limit is reached, after which the\n\
        barcode is refused.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Ledger file to use (overrides config)
    #[arg(long, short = 'L', env = "REDEEMLY_LEDGER", global = true)]
    pub ledger: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "REDEEMLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Ledger order, newest row last
    OldestFirst,
    /// Newest row first
    NewestFirst,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record one use of a barcode
    #[command(alias = "reg", alias = "r")]
    Register(RegisterArgs),

    /// Read barcodes from the terminal until end of input
    Scan(ScanArgs),

    /// Show every recorded use of a barcode
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Delete one ledger entry by barcode, date, and sequence
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Show the most recent ledger entries
    Recent(RecentArgs),

    /// Create, inspect, and switch ledger files
    Ledger(LedgerArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REGISTRATION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Barcode to register
    pub barcode: String,

    /// Redemption limit if the barcode is new (1-1000)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Only print the outcome, not the history and recent entries
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Redemption limit for new barcodes (1-1000); asks when unset
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SEARCH & DELETE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Barcode to look up
    pub barcode: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Barcode of the entry
    pub barcode: String,

    /// Date cell of the entry, as shown by search (YYYY-MM-DD HH:MM)
    #[arg(long, short = 'd')]
    pub date: String,

    /// Sequence number of the entry
    #[arg(long, short = 's')]
    pub sequence: u32,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RECENT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RecentArgs {
    /// Number of entries to show [default: 100]
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Display order [default: oldest-first]
    #[arg(long)]
    pub order: Option<OrderArg>,

    /// Keep running and re-render when the ledger changes
    #[arg(long, short = 'f')]
    pub follow: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LEDGER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Create the ledger, or complete its header row
    Init,

    /// Show the active ledger's path and row counts
    Info,

    /// Make another ledger file the active one
    Open {
        /// Ledger file (created if missing)
        path: PathBuf,
    },

    /// Copy the active ledger to a new file and make the copy active
    SaveAs {
        /// Destination file
        path: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set the default redemption limit for new barcodes
    SetLimit {
        /// Limit (1-1000)
        #[arg(required_unless_present = "clear")]
        limit: Option<u32>,

        /// Remove the default so every new barcode asks
        #[arg(long, conflicts_with = "limit")]
        clear: bool,
    },

    /// Set the ledger file used when --ledger is not given
    SetLedger {
        /// Ledger file
        path: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
