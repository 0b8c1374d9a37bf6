//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits tab-separated cells.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use redeemly_core::{Remark, UsageRecord};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ───────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Remark label, colored by how close the coupon is to its limit.
pub fn paint_remark(remark: Remark, color: bool) -> String {
    let label = remark.label();
    if !color {
        return label.to_owned();
    }
    match remark {
        Remark::New => label.green().to_string(),
        Remark::Reused => label.to_string(),
        Remark::LimitReached => label.yellow().bold().to_string(),
    }
}

// ── Ledger rows ─────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct RecordRow {
    #[tabled(rename = "Barcode")]
    barcode: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Count")]
    count: String,
    #[tabled(rename = "Remark")]
    remark: String,
    #[tabled(rename = "Limit")]
    limit: String,
}

impl RecordRow {
    pub fn new(record: &UsageRecord, color: bool) -> Self {
        Self {
            barcode: record.barcode.clone(),
            date: record.timestamp.clone(),
            count: record.sequence_label(),
            remark: paint_remark(record.remark, color),
            limit: record.limit_label(),
        }
    }
}

/// Ledger cells joined by tabs, as written to the sheet.
pub fn plain_record(record: &UsageRecord) -> String {
    [
        record.barcode.clone(),
        record.timestamp.clone(),
        record.sequence_label(),
        record.remark.label().to_owned(),
        record.limit_label(),
    ]
    .join("\t")
}

/// Render ledger records in the chosen format.
pub fn render_records(format: OutputFormat, records: &[UsageRecord], color: bool) -> String {
    render_list(
        format,
        records,
        |r| RecordRow::new(r, color),
        plain_record,
    )
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `plain_fn` on each item to emit one line per item
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&plain_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => plain_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    if rows.is_empty() {
        return "(no entries)".into();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| {
        tracing::error!(error = %e, "JSON serialization failed");
        String::new()
    })
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| {
        tracing::error!(error = %e, "YAML serialization failed");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> UsageRecord {
        UsageRecord {
            barcode: "123".into(),
            timestamp: "2025-01-01 09:00".into(),
            sequence: 1,
            remark: Remark::New,
            limit: Some(5),
        }
    }

    #[test]
    fn plain_matches_ledger_cells() {
        assert_eq!(
            render_records(OutputFormat::Plain, &[record()], false),
            "123\t2025-01-01 09:00\t1 회\t신규 등록\t5회"
        );
    }

    #[test]
    fn table_shows_headers_and_cells() {
        let table = render_records(OutputFormat::Table, &[record()], false);
        assert!(table.contains("Barcode"));
        assert!(table.contains("신규 등록"));
        assert!(table.contains("5회"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render_records(OutputFormat::Table, &[], false), "(no entries)");
    }

    #[test]
    fn json_uses_serde_field_names() {
        let json = render_records(OutputFormat::JsonCompact, &[record()], false);
        assert!(json.starts_with('['));
        assert!(json.contains("\"barcode\":\"123\""));
        assert!(json.contains("\"remark\":\"NEW\""));
    }
}
