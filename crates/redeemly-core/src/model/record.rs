// ── Usage record domain type ──

use std::fmt;

use serde::{Deserialize, Serialize};

use super::remark::Remark;
use crate::error::CoreError;

/// `chrono` format of the ledger's date column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Smallest redemption limit a barcode can be registered with.
pub const MIN_LIMIT: u32 = 1;

/// Largest redemption limit a barcode can be registered with.
pub const MAX_LIMIT: u32 = 1000;

/// Limit offered when the operator is prompted on first registration.
pub const DEFAULT_LIMIT: u32 = 10;

/// Unit suffix of the sequence and limit columns.
const COUNT_UNIT: &str = "회";

/// One row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub barcode: String,
    /// Local time of the usage, `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    /// 1-based ordinal of this usage among the barcode's rows.
    pub sequence: u32,
    pub remark: Remark,
    /// Maximum accepted uses, copied from the barcode's first row. Ledgers
    /// from before the limit column have no value here.
    pub limit: Option<u32>,
}

impl UsageRecord {
    /// The identity attached to this row wherever it is displayed.
    pub fn key(&self) -> RowKey {
        RowKey {
            barcode: self.barcode.clone(),
            timestamp: self.timestamp.clone(),
            sequence: self.sequence,
        }
    }

    pub fn matches(&self, key: &RowKey) -> bool {
        self.barcode == key.barcode
            && self.timestamp == key.timestamp
            && self.sequence == key.sequence
    }

    /// Cell text of the sequence column (`"3 회"`).
    pub fn sequence_label(&self) -> String {
        format_sequence(self.sequence)
    }

    /// Cell text of the limit column (`"10회"`), empty when unset.
    pub fn limit_label(&self) -> String {
        self.limit.map(format_limit).unwrap_or_default()
    }

    /// Short progress summary, e.g. `"processed 3/10"`.
    pub fn summary(&self) -> String {
        match self.limit {
            Some(limit) => format!("processed {}/{limit}", self.sequence),
            None => format!("processed {}", self.sequence),
        }
    }
}

/// Exact (barcode, timestamp, sequence) identity of a ledger row.
///
/// Deletion resolves rows by this key at the time of the request, never by
/// display position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowKey {
    pub barcode: String,
    pub timestamp: String,
    pub sequence: u32,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.barcode,
            self.timestamp,
            format_sequence(self.sequence)
        )
    }
}

// ── Formatting helpers ──────────────────────────────────────────────

pub fn format_sequence(n: u32) -> String {
    format!("{n} {COUNT_UNIT}")
}

pub fn format_limit(n: u32) -> String {
    format!("{n}{COUNT_UNIT}")
}

/// Parse a count cell such as `"3 회"`, `"10회"`, or a bare `"7"`.
pub fn parse_count(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let digits = trimmed.strip_suffix(COUNT_UNIT).unwrap_or(trimmed).trim();
    digits.parse().ok()
}

/// Current local time in the ledger's date format.
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Trim a scanned barcode and reject empty input.
pub fn normalize_barcode(input: &str) -> Result<String, CoreError> {
    let barcode = input.trim();
    if barcode.is_empty() {
        return Err(CoreError::validation("barcode must not be empty"));
    }
    Ok(barcode.to_owned())
}

/// Check a caller-supplied limit against the allowed range.
pub fn validate_limit(limit: u32) -> Result<u32, CoreError> {
    if (MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(CoreError::validation(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn count_cells_round_trip_through_labels() {
        assert_eq!(format_sequence(3), "3 회");
        assert_eq!(format_limit(10), "10회");
        assert_eq!(parse_count("3 회"), Some(3));
        assert_eq!(parse_count("10회"), Some(10));
        assert_eq!(parse_count(" 7 "), Some(7));
    }

    #[test]
    fn parse_count_rejects_garbage() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("회"), None);
        assert_eq!(parse_count("-1 회"), None);
        assert_eq!(parse_count("three"), None);
    }

    #[test]
    fn barcode_is_trimmed_and_required() {
        assert_eq!(normalize_barcode("  123 \n").unwrap(), "123");
        assert!(matches!(
            normalize_barcode("   "),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn limit_range_is_inclusive() {
        assert_eq!(validate_limit(1).unwrap(), 1);
        assert_eq!(validate_limit(1000).unwrap(), 1000);
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1001).is_err());
    }

    #[test]
    fn key_matches_only_exact_triple() {
        let record = UsageRecord {
            barcode: "123".into(),
            timestamp: "2025-01-02 10:30".into(),
            sequence: 2,
            remark: Remark::Reused,
            limit: Some(5),
        };
        assert!(record.matches(&record.key()));

        let mut other = record.key();
        other.sequence = 3;
        assert!(!record.matches(&other));
        assert_eq!(record.summary(), "processed 2/5");
    }

    #[test]
    fn unset_limit_renders_blank() {
        let record = UsageRecord {
            barcode: "L1".into(),
            timestamp: "2025-01-01 09:00".into(),
            sequence: 1,
            remark: Remark::New,
            limit: None,
        };
        assert_eq!(record.limit_label(), "");
        assert_eq!(record.summary(), "processed 1");
    }
}
