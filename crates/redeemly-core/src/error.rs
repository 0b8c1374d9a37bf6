// ── Core error types ──
//
// User-facing errors from redeemly-core. Spreadsheet library errors never
// leak out directly; the store translates them into `Storage` with the
// ledger path and the underlying cause.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Ledger file not found: {path}")]
    LedgerNotFound { path: String },

    #[error("Ledger storage failed for {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("Malformed ledger row {row}: {reason}")]
    MalformedRow {
        /// 1-based sheet row, as shown by spreadsheet applications.
        row: usize,
        reason: String,
    },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("Interaction failed: {message}")]
    Interaction { message: String },
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn storage(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::Storage {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
