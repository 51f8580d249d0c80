//! Sheet Reader
//!
//! Reads the first sheet of a workbook into a plain 2D cell grid. Row 0 is
//! the header row; every other row is data. Two container formats are
//! supported:
//!
//! - **xlsx**: Office Open XML workbook (zip archive of XML parts)
//! - **csv**: comma-separated text, quote aware
//!
//! Reading the file bytes is the only async step. Decoding is synchronous.

mod csv;
mod xlsx;

pub use self::csv::{decode_csv, split_csv_records};
pub use self::xlsx::decode_xlsx;

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failures while turning file bytes into a cell grid.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid xlsx container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed workbook XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("workbook is missing part '{0}'")]
    MissingPart(String),

    #[error("unsupported spreadsheet format '{0}' (expected .xlsx or .csv)")]
    UnsupportedFormat(String),

    #[error("workbook contains no sheets")]
    NoSheets,

    #[error("sheet text is not valid UTF-8")]
    Encoding,
}

// ============================================================================
// Cells
// ============================================================================

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// True for empty cells and empty strings.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Numeric coercion used by the row parsers.
    ///
    /// Numbers pass through, text is trimmed and parsed, booleans map to
    /// 1/0. Empty cells, unparseable text and non-finite values yield `None`.
    pub fn to_number(&self) -> Option<f64> {
        let value = match self {
            Self::Empty => return None,
            Self::Number(v) => *v,
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
            Self::Bool(b) => f64::from(u8::from(*b)),
        };
        value.is_finite().then_some(value)
    }

    /// Text coercion: trimmed display text, `None` when blank.
    pub fn to_text(&self) -> Option<String> {
        let text = self.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Self::Number(v) => write!(f, "{v}"),
        }
    }
}

// ============================================================================
// Sheets
// ============================================================================

/// The first sheet of a workbook as a row-major grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Sheet name (xlsx) or file stem (csv)
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Header row, if the sheet has any rows at all
    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows (everything after the header)
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Spreadsheet container format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(SheetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Decode raw file bytes into the first sheet of the workbook.
pub fn decode_sheet(bytes: &[u8], format: SheetFormat, fallback_name: &str) -> Result<Sheet, SheetError> {
    match format {
        SheetFormat::Xlsx => decode_xlsx(bytes),
        SheetFormat::Csv => decode_csv(bytes, fallback_name),
    }
}

/// Read a spreadsheet file and decode its first sheet.
pub async fn read_sheet(path: impl AsRef<Path>) -> Result<Sheet, SheetError> {
    let path = path.as_ref();
    let format = SheetFormat::from_path(path)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| SheetError::Io(path.to_path_buf(), e))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1");

    let sheet = decode_sheet(&bytes, format, stem)?;
    tracing::debug!(
        file = %path.display(),
        sheet = %sheet.name,
        rows = sheet.rows.len(),
        "Decoded sheet"
    );
    Ok(sheet)
}
