//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use redeemly_config::ConfigError;
use redeemly_core::CoreError;

/// Process exit codes. Success is 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CANCELLED: i32 = 5;
    pub const REJECTED: i32 = 6;
    pub const STORAGE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Ledger ───────────────────────────────────────────────────────
    #[error("Ledger {path} cannot be used")]
    #[diagnostic(
        code(redeemly::ledger_unavailable),
        help(
            "{reason}\n\
             Check that the directory exists and is writable, or pick another\n\
             ledger with --ledger or: redeemly config set-ledger <path>"
        )
    )]
    LedgerUnavailable { path: String, reason: String },

    #[error("Ledger file not found: {path}")]
    #[diagnostic(
        code(redeemly::ledger_not_found),
        help("Create it with: redeemly ledger init")
    )]
    LedgerNotFound { path: String },

    #[error("Could not read or write ledger {path}")]
    #[diagnostic(
        code(redeemly::storage),
        help("{reason}\nIf the file is open in a spreadsheet application, close it and retry.")
    )]
    Storage { path: String, reason: String },

    #[error("Ledger row {row} cannot be read: {reason}")]
    #[diagnostic(
        code(redeemly::malformed_row),
        help("Fix or remove the row in a spreadsheet application, then retry.")
    )]
    MalformedRow { row: usize, reason: String },

    #[error("No ledger entry {key}")]
    #[diagnostic(
        code(redeemly::not_found),
        help("Run: redeemly search {barcode} to see the barcode's entries")
    )]
    EntryNotFound { key: String, barcode: String },

    // ── Redemption ───────────────────────────────────────────────────
    #[error("Barcode '{barcode}' has reached its redemption limit of {limit}")]
    #[diagnostic(
        code(redeemly::limit_exceeded),
        help("The coupon has no uses left. Delete an entry to free one up.")
    )]
    LimitExceeded { barcode: String, limit: u32 },

    #[error("{action} cancelled")]
    #[diagnostic(code(redeemly::cancelled))]
    Cancelled { action: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(redeemly::validation))]
    Validation { field: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Barcode '{barcode}' has no redemption limit yet")]
    #[diagnostic(
        code(redeemly::limit_required),
        help(
            "Pass --limit <N>, or set a default with: redeemly config set-limit <N>\n\
             Input is not a terminal, so the limit cannot be asked for."
        )
    )]
    NonInteractiveRequiresLimit { barcode: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(redeemly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Terminal interaction failed: {message}")]
    #[diagnostic(code(redeemly::interaction))]
    Interaction { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(redeemly::config),
        help("Inspect the file with: redeemly config show")
    )]
    Config(#[from] ConfigError),

    // ── Watch / IO ───────────────────────────────────────────────────
    #[error("Cannot watch {path} for changes: {reason}")]
    #[diagnostic(code(redeemly::watch))]
    Watch { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LedgerNotFound { .. } | Self::EntryNotFound { .. } => exit_code::NOT_FOUND,
            Self::LedgerUnavailable { .. } | Self::Storage { .. } | Self::MalformedRow { .. } => {
                exit_code::STORAGE
            }
            Self::LimitExceeded { .. } => exit_code::REJECTED,
            Self::Cancelled { .. } => exit_code::CANCELLED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresLimit { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Interaction { .. } | Self::Config(_) | Self::Watch { .. } | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::LedgerNotFound { path } => CliError::LedgerNotFound { path },
            CoreError::Storage { path, reason } => CliError::Storage { path, reason },
            CoreError::MalformedRow { row, reason } => CliError::MalformedRow { row, reason },
            CoreError::Interaction { message } => CliError::Interaction { message },
        }
    }
}
