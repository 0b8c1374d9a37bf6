// ── Ledger store ──
//
// Append-only usage log on the first sheet of an xlsx workbook. Every
// operation re-reads the file and every mutation rewrites it whole, so the
// store holds no state beyond its path.

use std::path::{Path, PathBuf};

use super::sheet::{self, Cell, Workbook};
use crate::error::CoreError;
use crate::model::{RowKey, UsageRecord, parse_count};

/// Header row of the ledger sheet: barcode, date, sequence, remark, limit.
pub const HEADERS: [&str; 5] = ["바코드", "날짜", "횟수", "비고", "최대 중복"];

/// What [`LedgerStore::ensure_initialized`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerInit {
    /// The file did not exist and was created with a header row.
    Created,
    /// The header row was short; this many header cells were filled in.
    HeadersAdded(usize),
    /// Nothing to do.
    Ready,
}

/// Handle to a ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the ledger with its header row, or complete a short header.
    ///
    /// Idempotent; safe to call at every startup.
    pub fn ensure_initialized(&self) -> Result<LedgerInit, CoreError> {
        if !self.exists() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::storage(&self.path, e))?;
            }
            let mut book = Workbook::with_ledger_sheet();
            book.ledger_mut().rows.push(header_row());
            sheet::write_workbook(&self.path, &book)?;
            tracing::info!(path = %self.path.display(), "ledger created");
            return Ok(LedgerInit::Created);
        }

        let mut book = sheet::read_workbook(&self.path)?;
        let ledger = book.ledger_mut();
        if ledger.rows.is_empty() {
            ledger.rows.push(Vec::new());
        }

        let header = &mut ledger.rows[0];
        let mut added = 0;
        for (i, name) in HEADERS.iter().enumerate() {
            match header.get_mut(i) {
                Some(cell) if !cell.is_blank() => {}
                Some(cell) => {
                    *cell = Cell::Text((*name).to_owned());
                    added += 1;
                }
                None => {
                    header.push(Cell::Text((*name).to_owned()));
                    added += 1;
                }
            }
        }

        if added == 0 {
            return Ok(LedgerInit::Ready);
        }

        sheet::write_workbook(&self.path, &book)?;
        tracing::info!(path = %self.path.display(), added, "ledger header completed");
        Ok(LedgerInit::HeadersAdded(added))
    }

    /// Add one row at the end of the ledger.
    pub fn append(&self, record: &UsageRecord) -> Result<(), CoreError> {
        let mut book = sheet::read_workbook(&self.path)?;
        let ledger = book.ledger_mut();
        if ledger.rows.is_empty() {
            ledger.rows.push(header_row());
        }
        ledger.rows.push(encode_row(record));
        sheet::write_workbook(&self.path, &book)?;

        tracing::debug!(
            barcode = %record.barcode,
            sequence = record.sequence,
            "ledger row appended"
        );
        Ok(())
    }

    /// All rows for `barcode`, oldest first.
    ///
    /// Every matching row must decode: the redemption count depends on them.
    pub fn scan_by_barcode(&self, barcode: &str) -> Result<Vec<UsageRecord>, CoreError> {
        let book = sheet::read_workbook(&self.path)?;
        data_rows(&book)
            .filter(|(_, cells)| row_barcode(cells) == barcode)
            .map(|(row, cells)| decode_row(row, cells))
            .collect()
    }

    /// The last `limit` rows in file order. Rows that fail to decode are
    /// skipped with a warning.
    pub fn tail(&self, limit: usize) -> Result<Vec<UsageRecord>, CoreError> {
        let book = sheet::read_workbook(&self.path)?;
        let rows: Vec<_> = data_rows(&book).collect();
        let start = rows.len().saturating_sub(limit);

        Ok(rows[start..]
            .iter()
            .filter_map(|(row, cells)| decode_lenient(*row, cells))
            .collect())
    }

    /// Every decodable row in file order.
    pub fn records(&self) -> Result<Vec<UsageRecord>, CoreError> {
        self.tail(usize::MAX)
    }

    /// Number of data rows, decodable or not.
    pub fn row_count(&self) -> Result<usize, CoreError> {
        let book = sheet::read_workbook(&self.path)?;
        Ok(data_rows(&book).count())
    }

    /// Remove every row whose (barcode, timestamp, sequence) equals `key`.
    ///
    /// Only those three cells are compared, so a row with a broken remark or
    /// limit can still be removed. Returns the number of rows removed. The
    /// remaining rows keep their order and every other sheet is carried
    /// over. Nothing is written when no row matches.
    pub fn delete_matching(&self, key: &RowKey) -> Result<usize, CoreError> {
        let mut book = sheet::read_workbook(&self.path)?;
        let ledger = book.ledger_mut();

        let before = ledger.rows.len();
        let mut header = true;
        ledger.rows.retain(|cells| {
            if std::mem::take(&mut header) || is_blank_row(cells) {
                return true;
            }
            !key_matches(cells, key)
        });
        let removed = before - ledger.rows.len();

        if removed == 0 {
            tracing::debug!(key = %key, "no ledger rows matched");
            return Ok(0);
        }

        sheet::write_workbook(&self.path, &book)?;
        tracing::info!(key = %key, removed, "ledger rows deleted");
        Ok(removed)
    }

    /// Copy the whole workbook to `dest` and return a store bound to it.
    pub fn copy_to(&self, dest: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let dest = Self::new(dest);
        let book = sheet::read_workbook(&self.path)?;
        if let Some(parent) = dest.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::storage(&dest.path, e))?;
        }
        sheet::write_workbook(&dest.path, &book)?;
        tracing::info!(
            from = %self.path.display(),
            to = %dest.path.display(),
            "ledger copied"
        );
        Ok(dest)
    }
}

// ── Row codec ───────────────────────────────────────────────────────

fn header_row() -> Vec<Cell> {
    HEADERS
        .iter()
        .map(|name| Cell::Text((*name).to_owned()))
        .collect()
}

fn encode_row(record: &UsageRecord) -> Vec<Cell> {
    vec![
        Cell::Text(record.barcode.clone()),
        Cell::Text(record.timestamp.clone()),
        Cell::Text(record.sequence_label()),
        Cell::Text(record.remark.label().to_owned()),
        Cell::Text(record.limit_label()),
    ]
}

/// Non-blank rows below the header, with their 1-based sheet row number.
fn data_rows(book: &Workbook) -> impl Iterator<Item = (usize, &[Cell])> {
    book.ledger()
        .into_iter()
        .flat_map(|sheet| sheet.rows.iter().enumerate().skip(1))
        .filter(|(_, cells)| !is_blank_row(cells))
        .map(|(i, cells)| (i + 1, cells.as_slice()))
}

fn is_blank_row(cells: &[Cell]) -> bool {
    cells.iter().all(Cell::is_blank)
}

fn cell_text(cells: &[Cell], col: usize) -> String {
    cells
        .get(col)
        .map(Cell::text)
        .unwrap_or_default()
        .trim()
        .to_owned()
}

fn row_barcode(cells: &[Cell]) -> String {
    cell_text(cells, 0)
}

fn key_matches(cells: &[Cell], key: &RowKey) -> bool {
    row_barcode(cells) == key.barcode
        && cell_text(cells, 1) == key.timestamp
        && parse_count(&cell_text(cells, 2)) == Some(key.sequence)
}

fn decode_row(row: usize, cells: &[Cell]) -> Result<UsageRecord, CoreError> {
    let malformed = |reason: String| CoreError::MalformedRow { row, reason };

    let barcode = row_barcode(cells);
    if barcode.is_empty() {
        return Err(malformed("missing barcode".into()));
    }

    let timestamp = cell_text(cells, 1);
    if timestamp.is_empty() {
        return Err(malformed("missing date".into()));
    }

    let sequence_text = cell_text(cells, 2);
    let sequence = parse_count(&sequence_text)
        .filter(|n| *n >= 1)
        .ok_or_else(|| malformed(format!("invalid sequence '{sequence_text}'")))?;

    let remark_text = cell_text(cells, 3);
    let remark = remark_text
        .parse()
        .map_err(|_| malformed(format!("unknown remark '{remark_text}'")))?;

    // Blank in ledgers written before the limit column existed.
    let limit_text = cell_text(cells, 4);
    let limit = if limit_text.is_empty() {
        None
    } else {
        let limit = parse_count(&limit_text)
            .filter(|n| *n >= 1)
            .ok_or_else(|| malformed(format!("invalid limit '{limit_text}'")))?;
        Some(limit)
    };

    Ok(UsageRecord {
        barcode,
        timestamp,
        sequence,
        remark,
        limit,
    })
}

fn decode_lenient(row: usize, cells: &[Cell]) -> Option<UsageRecord> {
    match decode_row(row, cells) {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!(%err, "skipping ledger row");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Remark;

    fn text_row(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Text((*v).to_owned())).collect()
    }

    #[test]
    fn decodes_written_cells() {
        let record = UsageRecord {
            barcode: "123".into(),
            timestamp: "2025-03-01 09:15".into(),
            sequence: 1,
            remark: Remark::New,
            limit: Some(5),
        };
        let cells = encode_row(&record);
        assert_eq!(cells[2], Cell::Text("1 회".into()));
        assert_eq!(cells[4], Cell::Text("5회".into()));
        assert_eq!(decode_row(2, &cells).unwrap(), record);
    }

    #[test]
    fn decodes_numeric_cells_from_hand_edited_sheets() {
        let cells = vec![
            Cell::Number(880_123.0),
            Cell::Text("2025-03-01 09:15".into()),
            Cell::Number(2.0),
            Cell::Text("REUSED".into()),
            Cell::Number(10.0),
        ];
        let record = decode_row(3, &cells).unwrap();
        assert_eq!(record.barcode, "880123");
        assert_eq!(record.sequence, 2);
        assert_eq!(record.remark, Remark::Reused);
        assert_eq!(record.limit, Some(10));
    }

    #[test]
    fn blank_limit_cell_decodes_as_unset() {
        let short = text_row(&["L1", "2025-01-01 09:00", "1 회", "신규 등록"]);
        assert_eq!(decode_row(2, &short).unwrap().limit, None);

        let blank = text_row(&["L1", "2025-01-01 09:00", "1 회", "신규 등록", " "]);
        assert_eq!(decode_row(2, &blank).unwrap().limit, None);

        let garbage = text_row(&["L1", "2025-01-01 09:00", "1 회", "신규 등록", "many"]);
        assert!(matches!(
            decode_row(2, &garbage),
            Err(CoreError::MalformedRow { row: 2, .. })
        ));
    }

    #[test]
    fn key_match_ignores_remark_and_limit_cells() {
        let key = RowKey {
            barcode: "9".into(),
            timestamp: "2025-01-01 09:00".into(),
            sequence: 1,
        };
        let broken = text_row(&["9", "2025-01-01 09:00", "1 회", "typo", "5회"]);
        assert!(key_matches(&broken, &key));

        let bare_sequence = vec![
            Cell::Number(9.0),
            Cell::Text("2025-01-01 09:00".into()),
            Cell::Number(1.0),
        ];
        assert!(key_matches(&bare_sequence, &key));

        let other = text_row(&["9", "2025-01-01 09:00", "2 회", "typo", "5회"]);
        assert!(!key_matches(&other, &key));
    }

    #[test]
    fn malformed_rows_name_the_sheet_row() {
        let cells = text_row(&["123", "2025-03-01 09:15", "x", "신규 등록", "5회"]);
        let err = decode_row(7, &cells).unwrap_err();
        assert!(matches!(err, CoreError::MalformedRow { row: 7, .. }));
    }

    #[test]
    fn blank_rows_are_not_data_rows() {
        let mut book = Workbook::with_ledger_sheet();
        let rows = &mut book.ledger_mut().rows;
        rows.push(header_row());
        rows.push(text_row(&["1", "2025-03-01 09:15", "1 회", "신규 등록", "5회"]));
        rows.push(vec![Cell::Empty, Cell::Text("  ".into())]);
        rows.push(text_row(&["2", "2025-03-01 09:16", "1 회", "신규 등록", "5회"]));

        let numbers: Vec<usize> = data_rows(&book).map(|(row, _)| row).collect();
        assert_eq!(numbers, vec![2, 4]);
    }
}
