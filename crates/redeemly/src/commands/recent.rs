//! Recent command: the ledger tail, optionally followed as it changes.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use redeemly_core::{DisplayOrder, RecentOptions, RecentReport, Session};

use crate::cli::{OrderArg, OutputFormat, RecentArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

impl From<OrderArg> for DisplayOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::OldestFirst => DisplayOrder::OldestFirst,
            OrderArg::NewestFirst => DisplayOrder::NewestFirst,
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

pub(crate) fn report_table(report: &RecentReport, color: bool) -> String {
    output::render_records(OutputFormat::Table, &report.entries, color)
}

fn render_report(format: OutputFormat, report: &RecentReport, color: bool) -> String {
    output::render_single(
        format,
        report,
        |r| report_table(r, color),
        |r| {
            r.entries
                .iter()
                .map(output::plain_record)
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &RecentArgs, ctx: &Context) -> Result<(), CliError> {
    let mut session = ctx.open_session()?;

    let defaults = ctx.recent_options();
    let count = args.count.unwrap_or(defaults.count);
    if count == 0 {
        return Err(CliError::Validation {
            field: "count".into(),
            reason: "must be at least 1".into(),
        });
    }
    session.set_recent_options(RecentOptions {
        count,
        order: args.order.map_or(defaults.order, DisplayOrder::from),
        scroll_to_newest: args.follow,
    });

    let report = session.recent()?;
    output::print_output(&render_report(ctx.output, &report, ctx.color), ctx.quiet);

    if args.follow {
        follow(&session, ctx, report)?;
    }
    Ok(())
}

/// Watch the ledger's directory and re-render whenever the ledger itself
/// is replaced or modified. Runs until the watcher shuts down.
fn follow(session: &Session, ctx: &Context, mut last: RecentReport) -> Result<(), CliError> {
    let dir = watch_dir(session.active_path());
    let watch_err = |e: notify::Error| CliError::Watch {
        path: dir.display().to_string(),
        reason: e.to_string(),
    };

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = RecommendedWatcher::new(tx, notify::Config::default()).map_err(watch_err)?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .map_err(watch_err)?;
    tracing::info!(path = %dir.display(), "following ledger changes");

    for event in rx {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "file watch error");
                continue;
            }
        };
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            continue;
        }

        for changed in &event.paths {
            match session.on_external_change(changed) {
                Ok(Some(report)) if report != last => {
                    output::print_output(
                        &render_report(ctx.output, &report, ctx.color),
                        ctx.quiet,
                    );
                    last = report;
                }
                Ok(_) => {}
                // A writer may be mid-rename; the next event re-reads.
                Err(e) => tracing::warn!(error = %e, "ledger re-read failed"),
            }
        }
    }
    Ok(())
}

fn watch_dir(ledger: &Path) -> PathBuf {
    ledger
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_watches_the_current_directory() {
        assert_eq!(watch_dir(Path::new("data.xlsx")), PathBuf::from("."));
        assert_eq!(
            watch_dir(Path::new("/srv/shop/data.xlsx")),
            PathBuf::from("/srv/shop")
        );
    }

    #[test]
    fn order_flag_maps_onto_display_order() {
        assert_eq!(
            DisplayOrder::from(OrderArg::NewestFirst),
            DisplayOrder::NewestFirst
        );
    }
}
