//! Spreadsheet Row Parser
//!
//! Converts a decoded [`Sheet`] into typed record collections. Header cells
//! are trimmed and matched against a synonym list per canonical field; rows
//! are converted one at a time so a single bad row never aborts the parse.
//!
//! Three record kinds are supported:
//!
//! - **bore**: drill-path joints ([`parse_bore_sheet`])
//! - **surface**: terrain profile points ([`parse_surface_sheet`])
//! - **boring log**: soil layers, optionally across many files
//!   ([`parse_boring_log_sheet`], [`load_boring_logs`])

mod bore;
mod boring_log;
mod surface;

pub use bore::{load_bore, parse_bore_sheet, BORE_FIELDS};
pub use boring_log::{
    batch_file_names, load_boring_logs, parse_boring_log_batch, parse_boring_log_sheet, BoringLogBatch, BORING_LOG_FIELDS,
};
pub use surface::{load_surface, parse_surface_sheet, SURFACE_FIELDS};

use crate::sheet::{Cell, SheetError};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Dataset Kinds
// ============================================================================

/// Which kind of spreadsheet a parse was attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Bore,
    Surface,
    BoringLog,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bore => "bore",
            Self::Surface => "surface",
            Self::BoringLog => "boring log",
        })
    }
}

// ============================================================================
// Errors & Warnings
// ============================================================================

/// Failures that abort one parse operation.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{kind} sheet is missing required column(s): {}", missing.join(", "))]
    MissingColumns {
        kind: DatasetKind,
        missing: Vec<String>,
    },

    #[error("{kind} sheet contains no usable data rows")]
    EmptyDataset { kind: DatasetKind },

    #[error("no boring log rows could be read from any of: {}", files.join(", "))]
    AllFilesFailed { files: Vec<String> },

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

/// A data row dropped because a mandatory field could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowConversionWarning {
    /// 1-based row number as shown by a spreadsheet program (header = 1)
    pub row: usize,
    /// Canonical field name that failed
    pub field: &'static str,
    /// Raw cell text
    pub value: String,
    /// What the field needed, e.g. "a number"
    pub expected: &'static str,
}

impl fmt::Display for RowConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "row {}: '{}' is empty", self.row, self.field)
        } else {
            write!(f, "row {}: '{}' value '{}' is not {}", self.row, self.field, self.value, self.expected)
        }
    }
}

/// A boring-log file skipped as a whole; the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSkippedWarning {
    pub file: String,
    pub reason: String,
}

impl fmt::Display for FileSkippedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped {}: {}", self.file, self.reason)
    }
}

/// Records surviving a parse, plus the rows that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub dropped_rows: Vec<RowConversionWarning>,
}

// ============================================================================
// Column Mapping
// ============================================================================

/// A canonical field and the header spellings that resolve to it.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub canonical: &'static str,
    pub synonyms: &'static [&'static str],
}

/// Resolved column index for each field of a record kind, in field order.
#[derive(Debug, Clone)]
pub(crate) struct ColumnMap {
    fields: &'static [FieldSpec],
    indices: Vec<Option<usize>>,
}

impl ColumnMap {
    /// Match header cells against the field synonyms. Matching is exact on
    /// trimmed text; when several columns match one field the last one wins.
    pub(crate) fn from_header(header: &[Cell], fields: &'static [FieldSpec]) -> Self {
        let mut indices = vec![None; fields.len()];

        for (col, cell) in header.iter().enumerate() {
            let text = cell.to_string();
            let name = text.trim();
            if name.is_empty() {
                continue;
            }
            for (slot, field) in indices.iter_mut().zip(fields) {
                if field.synonyms.contains(&name) {
                    *slot = Some(col);
                }
            }
        }

        Self { fields, indices }
    }

    /// Canonical names of every field without a column.
    pub(crate) fn missing(&self) -> Vec<String> {
        self.fields
            .iter()
            .zip(&self.indices)
            .filter(|(_, idx)| idx.is_none())
            .map(|(field, _)| field.canonical.to_string())
            .collect()
    }

    /// Fail with [`ParseError::MissingColumns`] unless every field resolved.
    pub(crate) fn require_all(&self, kind: DatasetKind) -> Result<(), ParseError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParseError::MissingColumns { kind, missing })
        }
    }

    /// Bind the map to one data row.
    pub(crate) fn row<'a>(&'a self, row_number: usize, cells: &'a [Cell]) -> RowView<'a> {
        RowView {
            map: self,
            row_number,
            cells,
        }
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// One data row seen through a [`ColumnMap`].
pub(crate) struct RowView<'a> {
    map: &'a ColumnMap,
    row_number: usize,
    cells: &'a [Cell],
}

impl<'a> RowView<'a> {
    fn cell(&self, field: usize) -> &'a Cell {
        self.map
            .indices
            .get(field)
            .copied()
            .flatten()
            .and_then(|col| self.cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    fn warning(&self, field: usize, expected: &'static str) -> RowConversionWarning {
        RowConversionWarning {
            row: self.row_number,
            field: self.map.fields[field].canonical,
            value: self.cell(field).to_string(),
            expected,
        }
    }

    /// Mandatory numeric field: failure drops the row.
    pub(crate) fn number(&self, field: usize) -> Result<f64, RowConversionWarning> {
        self.cell(field).to_number().ok_or_else(|| self.warning(field, "a number"))
    }

    /// Mandatory integral field. Fractional values and magnitudes beyond
    /// exact `f64` integers drop the row.
    pub(crate) fn whole_number(&self, field: usize) -> Result<i64, RowConversionWarning> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

        let value = self.number(field)?;
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            #[allow(clippy::cast_possible_truncation)]
            Ok(value as i64)
        } else {
            Err(self.warning(field, "a whole number"))
        }
    }

    /// Optional numeric field: failure defaults to 0.
    pub(crate) fn number_or_zero(&self, field: usize) -> f64 {
        self.cell(field).to_number().unwrap_or(0.0)
    }

    /// Mandatory text field: blank drops the row.
    pub(crate) fn text(&self, field: usize) -> Result<String, RowConversionWarning> {
        self.cell(field).to_text().ok_or_else(|| self.warning(field, "text"))
    }
}

/// True for rows with no cells or only blank cells.
pub(crate) fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_blank)
}

/// Shared row loop: skips blank rows, collects conversion warnings and
/// fails with [`ParseError::EmptyDataset`] when nothing survives.
pub(crate) fn convert_rows<T>(
    rows: &[Vec<Cell>],
    kind: DatasetKind,
    mut convert: impl FnMut(usize, &[Cell]) -> Result<T, RowConversionWarning>,
) -> Result<Parsed<T>, ParseError> {
    let mut records = Vec::new();
    let mut dropped_rows = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if is_blank_row(row) {
            continue;
        }
        // Data rows start on sheet row 2
        match convert(idx + 2, row) {
            Ok(record) => records.push(record),
            Err(warning) => {
                tracing::warn!(
                    kind = %kind,
                    row = warning.row,
                    field = warning.field,
                    value = %warning.value,
                    "Dropped row with unconvertible value"
                );
                dropped_rows.push(warning);
            }
        }
    }

    if records.is_empty() {
        return Err(ParseError::EmptyDataset { kind });
    }

    Ok(Parsed {
        records,
        dropped_rows,
    })
}
