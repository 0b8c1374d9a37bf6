//! Register command: record one use of a barcode.

use owo_colors::OwoColorize;

use redeemly_core::{Registration, Submission};

use crate::cli::{OutputFormat, RegisterArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::{recent, search, util};

// ── Rendering ───────────────────────────────────────────────────────

/// One-line outcome, colored by status.
pub(crate) fn outcome_line(registration: &Registration, color: bool) -> String {
    let text = registration.to_string();
    if !color {
        return text;
    }
    match registration {
        Registration::Accepted(_) => text.green().to_string(),
        Registration::LimitExceeded { .. } => text.red().bold().to_string(),
        Registration::Cancelled { .. } => text.dimmed().to_string(),
    }
}

fn plain_registration(registration: &Registration) -> String {
    registration.record().map_or_else(
        || registration.to_string(),
        output::plain_record,
    )
}

pub(crate) fn render_registration(
    format: OutputFormat,
    registration: &Registration,
    color: bool,
) -> String {
    output::render_single(
        format,
        registration,
        |r| outcome_line(r, color),
        plain_registration,
    )
}

fn render_submission(format: OutputFormat, submission: &Submission, color: bool) -> String {
    output::render_single(
        format,
        submission,
        |s| {
            format!(
                "{}\n\n{}\n\nRecent activity\n{}",
                outcome_line(&s.registration, color),
                search::history_detail(&s.history, color),
                recent::report_table(&s.recent, color)
            )
        },
        |s| plain_registration(&s.registration),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &RegisterArgs, ctx: &Context) -> Result<(), CliError> {
    let session = ctx.open_session()?;
    util::require_limit(ctx, &session, &args.barcode, args.limit)?;

    let mut operator = ctx.operator();
    let submission = session.submit(&args.barcode, args.limit, &mut operator)?;

    let out = if args.no_history {
        render_registration(ctx.output, &submission.registration, ctx.color)
    } else {
        render_submission(ctx.output, &submission, ctx.color)
    };
    output::print_output(&out, ctx.quiet);

    util::registration_status(&submission.registration)
}
