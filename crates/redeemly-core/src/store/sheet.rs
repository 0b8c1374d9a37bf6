// ── Workbook I/O ──
//
// Whole-workbook read via calamine and whole-workbook write via
// rust_xlsxwriter. Writes go to a temp file in the target directory and are
// renamed into place, so readers only ever see a complete file.

use std::io::Write;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::XlsxError;
use tempfile::NamedTempFile;

use crate::error::CoreError;

/// Name given to the ledger sheet of newly created workbooks.
pub(crate) const DEFAULT_SHEET_NAME: &str = "ledger";

/// A single cell value. Styling is not carried.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Text as a spreadsheet would show it. Whole numbers drop the `.0`.
    pub(crate) fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
            Data::Float(f) => Self::Number(*f),
            Data::Int(i) => Self::Number(int_to_f64(*i)),
            Data::Bool(b) => Self::Bool(*b),
            other => Self::Text(other.to_string()),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn int_to_f64(i: i64) -> f64 {
    i as f64
}

fn format_number(n: f64) -> String {
    if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// One worksheet as a dense grid anchored at A1.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }
}

/// Every sheet of a workbook, in workbook order. The first sheet is the ledger.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub(crate) fn with_ledger_sheet() -> Self {
        Self {
            sheets: vec![Sheet::new(DEFAULT_SHEET_NAME)],
        }
    }

    pub(crate) fn ledger(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// The ledger sheet, created if the workbook has none.
    pub(crate) fn ledger_mut(&mut self) -> &mut Sheet {
        if self.sheets.is_empty() {
            self.sheets.push(Sheet::new(DEFAULT_SHEET_NAME));
        }
        &mut self.sheets[0]
    }
}

// ── Read ────────────────────────────────────────────────────────────

pub(crate) fn read_workbook(path: &Path) -> Result<Workbook, CoreError> {
    if !path.exists() {
        return Err(CoreError::LedgerNotFound {
            path: path.display().to_string(),
        });
    }

    let mut xlsx = open_workbook::<Xlsx<_>, _>(path).map_err(|e| CoreError::storage(path, e))?;

    let mut sheets = Vec::new();
    for name in xlsx.sheet_names() {
        let range = xlsx
            .worksheet_range(&name)
            .map_err(|e| CoreError::storage(path, e))?;

        // calamine trims the range to used cells; re-anchor it at A1 so row
        // numbers line up with what a spreadsheet application shows.
        let (row_offset, col_offset) = range
            .start()
            .map_or((0, 0), |(r, c)| (to_usize(r), to_usize(c)));

        let mut rows = vec![Vec::new(); row_offset];
        for row in range.rows() {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(Cell::from));
            rows.push(cells);
        }

        sheets.push(Sheet { name, rows });
    }

    tracing::trace!(path = %path.display(), sheets = sheets.len(), "workbook read");
    Ok(Workbook { sheets })
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

// ── Write ───────────────────────────────────────────────────────────

/// Write the workbook to `path`, replacing any existing file atomically.
pub(crate) fn write_workbook(path: &Path, book: &Workbook) -> Result<(), CoreError> {
    let bytes = encode(book).map_err(|e| CoreError::storage(path, e))?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CoreError::storage(path, e))?;
    tmp.write_all(&bytes)
        .map_err(|e| CoreError::storage(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| CoreError::storage(path, e))?;
    tmp.persist(path)
        .map_err(|e| CoreError::storage(path, e.error))?;

    tracing::trace!(path = %path.display(), bytes = bytes.len(), "workbook written");
    Ok(())
}

fn encode(book: &Workbook) -> Result<Vec<u8>, XlsxError> {
    let mut out = rust_xlsxwriter::Workbook::new();

    for sheet in &book.sheets {
        let worksheet = out.add_worksheet();
        worksheet.set_name(sheet.name.as_str())?;

        for (r, row) in sheet.rows.iter().enumerate() {
            let r = u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (c, cell) in row.iter().enumerate() {
                let c = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s.as_str())?;
                    }
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n)?;
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b)?;
                    }
                }
            }
        }
    }

    out.save_to_buffer()
}
