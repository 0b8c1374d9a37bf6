//! Ledger command handlers: init, info, open, save-as.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use redeemly_core::{LedgerInit, LedgerStore, Remark, UsageRecord};

use crate::cli::{LedgerArgs, LedgerCommand};
use crate::config::{self, Context};
use crate::error::CliError;
use crate::output;

// ── Summary ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct LedgerInfo {
    path: PathBuf,
    /// Data rows, decodable or not.
    rows: usize,
    barcodes: usize,
    /// Barcodes whose latest row is `LIMIT_REACHED`.
    exhausted: usize,
    newest: Option<UsageRecord>,
}

impl LedgerInfo {
    fn collect(store: &LedgerStore) -> Result<Self, CliError> {
        let rows = store.row_count()?;
        let records = store.records()?;

        let barcodes: HashSet<&str> = records.iter().map(|r| r.barcode.as_str()).collect();
        let mut latest = HashMap::new();
        for record in &records {
            latest.insert(record.barcode.as_str(), record.remark);
        }
        let exhausted = latest
            .values()
            .filter(|remark| **remark == Remark::LimitReached)
            .count();

        Ok(Self {
            path: store.path().to_path_buf(),
            rows,
            barcodes: barcodes.len(),
            exhausted,
            newest: records.last().cloned(),
        })
    }

    fn detail(&self) -> String {
        let newest = self.newest.as_ref().map_or_else(
            || "-".to_owned(),
            |r| format!("{} {} ({})", r.barcode, r.timestamp, r.remark),
        );
        format!(
            "Ledger:    {}\nRows:      {}\nBarcodes:  {}\nExhausted: {}\nNewest:    {newest}",
            self.path.display(),
            self.rows,
            self.barcodes,
            self.exhausted,
        )
    }
}

fn print_info(store: &LedgerStore, ctx: &Context) -> Result<(), CliError> {
    let info = LedgerInfo::collect(store)?;
    let out = output::render_single(ctx.output, &info, LedgerInfo::detail, |i| {
        i.path.display().to_string()
    });
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// Remember `path` as the ledger for later invocations.
fn remember_ledger(ctx: &Context, path: &Path) -> Result<(), CliError> {
    let mut cfg = ctx.config.clone();
    cfg.ledger = Some(absolute(path));
    config::save_config(&cfg)?;
    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: LedgerArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        LedgerCommand::Init => {
            let store = LedgerStore::new(ctx.ledger_path());
            let init = store.ensure_initialized()?;
            if !ctx.quiet {
                match init {
                    LedgerInit::Created => eprintln!("Created {}", store.path().display()),
                    LedgerInit::HeadersAdded(n) => {
                        eprintln!("Added {n} missing header(s) to {}", store.path().display());
                    }
                    LedgerInit::Ready => {
                        eprintln!("{} is already initialized", store.path().display());
                    }
                }
            }
            print_info(&store, ctx)
        }

        LedgerCommand::Info => {
            let session = ctx.open_session()?;
            print_info(session.store(), ctx)
        }

        LedgerCommand::Open { path } => {
            // The current ledger may be the reason for switching.
            let session = ctx.open_session_at(path.clone())?;
            remember_ledger(ctx, &path)?;
            if !ctx.quiet {
                eprintln!("Active ledger: {}", session.active_path().display());
            }
            print_info(session.store(), ctx)
        }

        LedgerCommand::SaveAs { path } => {
            let mut session = ctx.open_session()?;
            let from = session.active_path().to_path_buf();
            session.save_as(&path)?;
            remember_ledger(ctx, &path)?;
            if !ctx.quiet {
                eprintln!(
                    "Saved {} as {}; it is now the active ledger",
                    from.display(),
                    session.active_path().display()
                );
            }
            print_info(session.store(), ctx)
        }
    }
}
