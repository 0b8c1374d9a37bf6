//! Shared helpers for command handlers.

use redeemly_core::{Registration, Session};

use crate::config::Context;
use crate::error::CliError;

/// Fail early when a barcode without a limit would need a prompt with no
/// terminal to show it on.
pub fn require_limit(
    ctx: &Context,
    session: &Session,
    barcode: &str,
    preset: Option<u32>,
) -> Result<(), CliError> {
    if ctx.interactive || preset.or(session.default_limit()).is_some() {
        return Ok(());
    }
    let history = session.search(barcode)?;
    if history.limit().is_none() {
        return Err(CliError::NonInteractiveRequiresLimit {
            barcode: history.barcode,
        });
    }
    Ok(())
}

/// Destructive actions need `--yes` when nobody can answer a prompt.
pub fn require_yes(ctx: &Context, action: &str) -> Result<(), CliError> {
    if ctx.yes || ctx.interactive {
        return Ok(());
    }
    Err(CliError::NonInteractiveRequiresYes {
        action: action.into(),
    })
}

/// Turn a refused or cancelled registration into its exit status.
pub fn registration_status(registration: &Registration) -> Result<(), CliError> {
    match registration {
        Registration::Accepted(_) => Ok(()),
        Registration::LimitExceeded { barcode, limit } => Err(CliError::LimitExceeded {
            barcode: barcode.clone(),
            limit: *limit,
        }),
        Registration::Cancelled { .. } => Err(CliError::Cancelled {
            action: "Registration".into(),
        }),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Interaction {
        message: format!("prompt failed: {e}"),
    }
}
