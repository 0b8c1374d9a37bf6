//! Search command: every recorded use of one barcode.

use redeemly_core::SearchResult;

use crate::cli::SearchArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

/// History table with a limit / remaining footer.
pub(crate) fn history_detail(result: &SearchResult, color: bool) -> String {
    if result.is_empty() {
        return format!("No entries for barcode {}", result.barcode);
    }
    let table = output::render_records(crate::cli::OutputFormat::Table, &result.records, color);
    match (result.limit(), result.remaining()) {
        (Some(limit), Some(remaining)) => format!(
            "History for {}\n{table}\nlimit {limit}, {remaining} remaining",
            result.barcode
        ),
        _ => table,
    }
}

pub fn handle(args: &SearchArgs, ctx: &Context) -> Result<(), CliError> {
    let session = ctx.open_session()?;
    let result = session.search(&args.barcode)?;

    let out = output::render_single(
        ctx.output,
        &result,
        |r| history_detail(r, ctx.color),
        |r| {
            r.records
                .iter()
                .map(output::plain_record)
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, ctx.quiet);
    Ok(())
}
