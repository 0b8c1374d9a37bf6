// ── Session ──
//
// Explicit context for one host: the active ledger plus the settings the
// operator picked. Every operation goes through here instead of ambient
// window state; every read still hits the file fresh.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{RowKey, normalize_barcode, validate_limit};
use crate::operator::Operator;
use crate::policy::{self, Registration};
use crate::report::{self, RecentOptions, RecentReport};
use crate::search::{self, DeleteOutcome, SearchResult};
use crate::store::{LedgerInit, LedgerStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub ledger: PathBuf,
    /// Limit for new barcodes; `None` prompts the operator each time.
    pub default_limit: Option<u32>,
    pub recent: RecentOptions,
}

/// Everything a host refreshes after a barcode is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub registration: Registration,
    pub history: SearchResult,
    pub recent: RecentReport,
}

#[derive(Debug)]
pub struct Session {
    store: LedgerStore,
    default_limit: Option<u32>,
    recent: RecentOptions,
}

impl Session {
    /// Bind to the configured ledger, creating or completing it as needed.
    ///
    /// Failure here means the ledger cannot be used at all.
    pub fn open(settings: SessionSettings) -> Result<Self, CoreError> {
        let default_limit = settings
            .default_limit
            .map(validate_limit)
            .transpose()?;
        let store = LedgerStore::new(settings.ledger);
        let init = store.ensure_initialized()?;
        tracing::debug!(path = %store.path().display(), ?init, "session opened");

        Ok(Self {
            store,
            default_limit,
            recent: settings.recent,
        })
    }

    pub fn active_path(&self) -> &Path {
        self.store.path()
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn default_limit(&self) -> Option<u32> {
        self.default_limit
    }

    pub fn set_default_limit(&mut self, limit: Option<u32>) -> Result<(), CoreError> {
        self.default_limit = limit.map(validate_limit).transpose()?;
        Ok(())
    }

    pub fn recent_options(&self) -> &RecentOptions {
        &self.recent
    }

    pub fn set_recent_options(&mut self, options: RecentOptions) {
        self.recent = options;
    }

    // ── Ledger operations ────────────────────────────────────────────

    /// Register a usage. `preset` overrides the session default for new
    /// barcodes only.
    pub fn register(
        &self,
        barcode: &str,
        preset: Option<u32>,
        operator: &mut dyn Operator,
    ) -> Result<Registration, CoreError> {
        policy::register(
            &self.store,
            barcode,
            preset.or(self.default_limit),
            operator,
        )
    }

    /// Register, then gather the barcode's history and the recent report
    /// scrolled to the newest row.
    pub fn submit(
        &self,
        barcode: &str,
        preset: Option<u32>,
        operator: &mut dyn Operator,
    ) -> Result<Submission, CoreError> {
        let barcode = normalize_barcode(barcode)?;
        let registration = self.register(&barcode, preset, operator)?;
        let history = self.search(&barcode)?;
        let recent = report::recent(
            &self.store,
            &RecentOptions {
                scroll_to_newest: true,
                ..self.recent
            },
        )?;

        Ok(Submission {
            registration,
            history,
            recent,
        })
    }

    pub fn search(&self, barcode: &str) -> Result<SearchResult, CoreError> {
        search::search(&self.store, barcode)
    }

    pub fn delete(
        &self,
        key: &RowKey,
        operator: &mut dyn Operator,
    ) -> Result<DeleteOutcome, CoreError> {
        search::delete(&self.store, key, operator)
    }

    pub fn recent(&self) -> Result<RecentReport, CoreError> {
        report::recent(&self.store, &self.recent)
    }

    /// Re-read recent activity.
    pub fn refresh(&self) -> Result<RecentReport, CoreError> {
        self.recent()
    }

    /// Handle a change reported by a file watcher. Returns a fresh report
    /// when `changed` is the active ledger.
    pub fn on_external_change(&self, changed: &Path) -> Result<Option<RecentReport>, CoreError> {
        if !same_file(changed, self.store.path()) {
            return Ok(None);
        }
        tracing::debug!(path = %changed.display(), "active ledger changed externally");
        self.refresh().map(Some)
    }

    // ── Active ledger ────────────────────────────────────────────────

    /// Make another ledger active, creating it if needed.
    pub fn switch_ledger(&mut self, path: impl Into<PathBuf>) -> Result<LedgerInit, CoreError> {
        let store = LedgerStore::new(path);
        let init = store.ensure_initialized()?;
        tracing::info!(
            from = %self.store.path().display(),
            to = %store.path().display(),
            "active ledger switched"
        );
        self.store = store;
        Ok(init)
    }

    /// Copy the active ledger to `dest` and continue on the copy.
    pub fn save_as(&mut self, dest: impl Into<PathBuf>) -> Result<(), CoreError> {
        self.store = self.store.copy_to(dest)?;
        Ok(())
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
