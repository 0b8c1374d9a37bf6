// ── Search & delete flow ──
//
// Per-barcode history for display, and deletion by exact row key behind
// two operator confirmations.

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{RowKey, UsageRecord, normalize_barcode};
use crate::operator::{NoticeKind, Operator};
use crate::store::LedgerStore;

/// Every row of one barcode, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub barcode: String,
    pub records: Vec<UsageRecord>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The barcode's limit, as fixed by its first row, if that row has one.
    pub fn limit(&self) -> Option<u32> {
        self.records.first().and_then(|r| r.limit)
    }

    /// Uses left before the limit, if the barcode is known.
    pub fn remaining(&self) -> Option<u32> {
        let used = u32::try_from(self.records.len()).unwrap_or(u32::MAX);
        self.limit().map(|limit| limit.saturating_sub(used))
    }

    /// Row keys in display order, for hosts that attach actions to rows.
    pub fn keys(&self) -> Vec<RowKey> {
        self.records.iter().map(UsageRecord::key).collect()
    }
}

pub fn search(store: &LedgerStore, barcode: &str) -> Result<SearchResult, CoreError> {
    let barcode = normalize_barcode(barcode)?;
    let records = store.scan_by_barcode(&barcode)?;
    tracing::debug!(%barcode, rows = records.len(), "barcode searched");
    Ok(SearchResult { barcode, records })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "rows", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// This many rows shared the key and were removed.
    Deleted(usize),
    /// The operator said no at one of the confirmations.
    Declined,
    /// No row carries the key any more.
    NotFound,
}

/// Delete every row carrying `key`, after two confirmations.
///
/// Rows that coincidentally share barcode, date, and sequence are all
/// removed; the key is the only identity a displayed row has.
pub fn delete(
    store: &LedgerStore,
    key: &RowKey,
    operator: &mut dyn Operator,
) -> Result<DeleteOutcome, CoreError> {
    if !operator.confirm("Delete entry", &format!("Delete ledger entry {key}?"))? {
        return Ok(DeleteOutcome::Declined);
    }
    if !operator.confirm(
        "Confirm delete",
        "This cannot be undone. Delete the entry permanently?",
    )? {
        return Ok(DeleteOutcome::Declined);
    }

    match store.delete_matching(key) {
        Ok(0) => {
            operator.notify(
                NoticeKind::Warning,
                "Delete failed",
                &format!("No ledger entry matches {key}."),
            );
            Ok(DeleteOutcome::NotFound)
        }
        Ok(removed) => {
            operator.notify(
                NoticeKind::Info,
                "Deleted",
                &format!("Removed {removed} ledger entry(s) for {key}."),
            );
            Ok(DeleteOutcome::Deleted(removed))
        }
        Err(err) => {
            operator.notify(NoticeKind::Error, "Delete failed", &err.to_string());
            Err(err)
        }
    }
}
