//! Delete command: remove one ledger entry by its exact row key.

use redeemly_core::{DeleteOutcome, RowKey};

use crate::cli::DeleteArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: &DeleteArgs, ctx: &Context) -> Result<(), CliError> {
    util::require_yes(ctx, "delete")?;

    let session = ctx.open_session()?;
    let key = RowKey {
        barcode: redeemly_core::model::normalize_barcode(&args.barcode)?,
        timestamp: args.date.trim().to_owned(),
        sequence: args.sequence,
    };

    let mut operator = ctx.operator();
    let outcome = session.delete(&key, &mut operator)?;

    let out = output::render_single(
        ctx.output,
        &outcome,
        |o| match o {
            DeleteOutcome::Deleted(1) => format!("Deleted {key}"),
            DeleteOutcome::Deleted(n) => format!("Deleted {n} entries matching {key}"),
            DeleteOutcome::Declined | DeleteOutcome::NotFound => String::new(),
        },
        |o| match o {
            DeleteOutcome::Deleted(n) => n.to_string(),
            DeleteOutcome::Declined | DeleteOutcome::NotFound => String::new(),
        },
    );
    output::print_output(&out, ctx.quiet);

    match outcome {
        DeleteOutcome::Deleted(_) => Ok(()),
        DeleteOutcome::Declined => Err(CliError::Cancelled {
            action: "Delete".into(),
        }),
        DeleteOutcome::NotFound => Err(CliError::EntryNotFound {
            key: key.to_string(),
            barcode: key.barcode,
        }),
    }
}
