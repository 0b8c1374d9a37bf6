// ── Recent-activity report ──
//
// Structured tail of the ledger for display. Layout belongs to the host.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::model::UsageRecord;
use crate::store::LedgerStore;

/// Rows shown when nothing else is configured.
pub const DEFAULT_RECENT: usize = 100;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DisplayOrder {
    /// File order; the newest row is last.
    #[default]
    OldestFirst,
    /// Reverse file order; the newest row is first.
    NewestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentOptions {
    pub count: usize,
    pub order: DisplayOrder,
    /// Ask the host to bring the newest row into view.
    pub scroll_to_newest: bool,
}

impl Default for RecentOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_RECENT,
            order: DisplayOrder::default(),
            scroll_to_newest: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentReport {
    pub entries: Vec<UsageRecord>,
    pub order: DisplayOrder,
    pub scroll_to_newest: bool,
}

impl RecentReport {
    /// Arrange `tail` (file order) for display.
    pub fn from_tail(mut tail: Vec<UsageRecord>, options: &RecentOptions) -> Self {
        if options.order == DisplayOrder::NewestFirst {
            tail.reverse();
        }
        Self {
            entries: tail,
            order: options.order,
            scroll_to_newest: options.scroll_to_newest,
        }
    }

    pub fn newest(&self) -> Option<&UsageRecord> {
        match self.order {
            DisplayOrder::OldestFirst => self.entries.last(),
            DisplayOrder::NewestFirst => self.entries.first(),
        }
    }

    /// Index of the newest entry, where a scrolling view should land.
    pub fn newest_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        match self.order {
            DisplayOrder::OldestFirst => Some(self.entries.len() - 1),
            DisplayOrder::NewestFirst => Some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn recent(store: &LedgerStore, options: &RecentOptions) -> Result<RecentReport, CoreError> {
    let tail = store.tail(options.count)?;
    tracing::debug!(rows = tail.len(), order = %options.order, "recent activity read");
    Ok(RecentReport::from_tail(tail, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Remark;

    fn rows(n: u32) -> Vec<UsageRecord> {
        (1..=n)
            .map(|i| UsageRecord {
                barcode: format!("b{i}"),
                timestamp: "2025-01-01 10:00".into(),
                sequence: 1,
                remark: Remark::New,
                limit: Some(5),
            })
            .collect()
    }

    #[test]
    fn oldest_first_keeps_file_order() {
        let report = RecentReport::from_tail(rows(3), &RecentOptions::default());
        assert_eq!(report.entries[0].barcode, "b1");
        assert_eq!(report.newest().map(|r| r.barcode.as_str()), Some("b3"));
        assert_eq!(report.newest_index(), Some(2));
    }

    #[test]
    fn newest_first_reverses() {
        let options = RecentOptions {
            order: DisplayOrder::NewestFirst,
            ..RecentOptions::default()
        };
        let report = RecentReport::from_tail(rows(3), &options);
        assert_eq!(report.entries[0].barcode, "b3");
        assert_eq!(report.newest().map(|r| r.barcode.as_str()), Some("b3"));
        assert_eq!(report.newest_index(), Some(0));
    }

    #[test]
    fn order_parses_from_kebab_case() {
        assert_eq!(
            "newest-first".parse::<DisplayOrder>().ok(),
            Some(DisplayOrder::NewestFirst)
        );
        assert_eq!(DisplayOrder::OldestFirst.to_string(), "oldest-first");
    }

    #[test]
    fn empty_report_has_no_newest() {
        let report = RecentReport::from_tail(Vec::new(), &RecentOptions::default());
        assert!(report.is_empty());
        assert_eq!(report.newest_index(), None);
    }
}
