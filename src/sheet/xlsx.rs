//! xlsx decoding
//!
//! An xlsx workbook is a zip archive of XML parts. Only three are needed to
//! read the first sheet:
//!
//! - `xl/workbook.xml` lists sheets in tab order with a relationship id
//! - `xl/_rels/workbook.xml.rels` maps relationship ids to part paths
//! - `xl/sharedStrings.xml` holds the string table (optional)
//!
//! Cells carry an `r` reference like `C7`; rows are padded with empty cells
//! so that column indices line up with the header row. Blank rows above the
//! first used row are dropped, so the header is always `rows[0]`.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Cell, Sheet, SheetError};

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const DEFAULT_SHEET_PART: &str = "xl/worksheets/sheet1.xml";

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

/// Decode the first sheet of an xlsx workbook.
pub fn decode_xlsx(bytes: &[u8]) -> Result<Sheet, SheetError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let (sheet_name, sheet_part) = locate_first_sheet(&mut archive)?;
    let shared_strings = match read_part(&mut archive, SHARED_STRINGS_PART)? {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    let sheet_xml = read_part(&mut archive, &sheet_part)?
        .ok_or_else(|| SheetError::MissingPart(sheet_part.clone()))?;
    let mut rows = parse_sheet_rows(&sheet_xml, &shared_strings)?;
    drop_leading_blank_rows(&mut rows);

    Ok(Sheet::new(sheet_name, rows))
}

/// Sheets may start below row 1; the used range begins at the first row
/// holding a non-blank cell.
fn drop_leading_blank_rows(rows: &mut Vec<Vec<Cell>>) {
    let first_used = rows
        .iter()
        .position(|row| !row.iter().all(Cell::is_blank))
        .unwrap_or(rows.len());
    rows.drain(..first_used);
}

/// Read a zip entry as UTF-8 text, `None` if the entry does not exist.
fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<Option<String>, SheetError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|_| SheetError::Encoding)?;
    Ok(Some(content))
}

// ============================================================================
// Workbook / Relationships
// ============================================================================

/// Find the name and part path of the first sheet in tab order.
fn locate_first_sheet(archive: &mut Archive<'_>) -> Result<(String, String), SheetError> {
    let Some(workbook_xml) = read_part(archive, WORKBOOK_PART)? else {
        // Bare archives without a workbook part still follow the default layout
        return Ok(("Sheet1".to_string(), DEFAULT_SHEET_PART.to_string()));
    };

    let (name, rel_id) = first_sheet_entry(&workbook_xml)?.ok_or(SheetError::NoSheets)?;

    let target = match (rel_id, read_part(archive, WORKBOOK_RELS_PART)?) {
        (Some(id), Some(rels_xml)) => parse_relationships(&rels_xml)?
            .remove(&id)
            .map_or_else(|| DEFAULT_SHEET_PART.to_string(), |t| resolve_target(&t)),
        _ => DEFAULT_SHEET_PART.to_string(),
    };

    Ok((name, target))
}

/// First `<sheet>` element of `workbook.xml`: (name, relationship id).
fn first_sheet_entry(xml: &str) -> Result<Option<(String, Option<String>)>, SheetError> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = attribute(&e, b"name")?.unwrap_or_else(|| "Sheet1".to_string());
                let rel_id = attribute(&e, b"id")?;
                return Ok(Some((name, rel_id)));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Map of relationship id to target path from a `.rels` part.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, SheetError> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id")?, attribute(&e, b"Target")?) {
                    rels.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    target
        .strip_prefix('/')
        .map_or_else(|| format!("xl/{target}"), str::to_string)
}

/// Unescaped value of the attribute whose local name is `key`.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, SheetError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

// ============================================================================
// Shared Strings
// ============================================================================

/// Parse the shared string table. Rich-text runs are concatenated and
/// phonetic hints (`<rPh>`) are ignored.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, SheetError> {
    let mut reader = Reader::from_str(xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_text = true,
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(t) if in_text && !in_phonetic => current.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

// ============================================================================
// Worksheet
// ============================================================================

/// Convert a cell reference like `AB12` into a zero-based column index.
pub(crate) fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();

    if letters.is_empty() {
        return None;
    }

    letters
        .iter()
        .try_fold(0usize, |acc, &b| {
            acc.checked_mul(26)?.checked_add(usize::from(b - b'A') + 1)
        })
        .map(|n| n - 1)
}

/// The cell currently being read from `<c>...</c>`.
#[derive(Default)]
struct PendingCell {
    column: usize,
    cell_type: Option<String>,
    value: String,
    inline: String,
}

impl PendingCell {
    fn finish(self, shared: &[String]) -> Cell {
        match self.cell_type.as_deref() {
            Some("s") => self
                .value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|i| shared.get(i))
                .map_or(Cell::Empty, |s| Cell::Text(s.clone())),
            Some("inlineStr") => Cell::Text(self.inline),
            Some("str" | "d") => Cell::Text(self.value),
            Some("b") => Cell::Bool(self.value.trim() == "1"),
            Some("e") => Cell::Empty,
            _ => {
                let raw = self.value.trim();
                if raw.is_empty() {
                    Cell::Empty
                } else {
                    raw.parse::<f64>()
                        .map_or_else(|_| Cell::Text(self.value.clone()), Cell::Number)
                }
            }
        }
    }
}

/// Which text-bearing element the reader is inside.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Inline,
}

fn place_cell(row: &mut Vec<Cell>, column: usize, cell: Cell) {
    if row.len() <= column {
        row.resize(column + 1, Cell::Empty);
    }
    row[column] = cell;
}

fn place_row(rows: &mut Vec<Vec<Cell>>, index: usize, row: Vec<Cell>) {
    if rows.len() <= index {
        rows.resize(index + 1, Vec::new());
    }
    rows[index] = row;
}

/// Parse `<sheetData>` into a row-major grid.
fn parse_sheet_rows(xml: &str, shared: &[String]) -> Result<Vec<Vec<Cell>>, SheetError> {
    let mut reader = Reader::from_str(xml);
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    let mut row_index = 0usize;
    let mut row: Vec<Cell> = Vec::new();
    let mut in_row = false;
    let mut pending: Option<PendingCell> = None;
    let mut target = TextTarget::None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"row" => {
                    if let Some(r) = attribute(&e, b"r")?.and_then(|r| r.parse::<usize>().ok()) {
                        row_index = r.saturating_sub(1);
                    }
                    row = Vec::new();
                    in_row = true;
                }
                b"c" if in_row => pending = Some(start_cell(&e, row.len())?),
                b"v" if pending.is_some() => target = TextTarget::Value,
                b"t" if pending.is_some() => target = TextTarget::Inline,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"row" => {
                    if let Some(r) = attribute(&e, b"r")?.and_then(|r| r.parse::<usize>().ok()) {
                        row_index = r.saturating_sub(1);
                    }
                    place_row(&mut rows, row_index, Vec::new());
                    row_index += 1;
                }
                b"c" if in_row => {
                    let cell = start_cell(&e, row.len())?;
                    let column = cell.column;
                    place_cell(&mut row, column, cell.finish(shared));
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(cell) = pending.as_mut() {
                    match target {
                        TextTarget::Value => cell.value.push_str(&t.unescape()?),
                        TextTarget::Inline => cell.inline.push_str(&t.unescape()?),
                        TextTarget::None => {}
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" | b"t" => target = TextTarget::None,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let column = cell.column;
                        place_cell(&mut row, column, cell.finish(shared));
                    }
                }
                b"row" => {
                    place_row(&mut rows, row_index, std::mem::take(&mut row));
                    row_index += 1;
                    in_row = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rows)
}

fn start_cell(e: &BytesStart<'_>, next_column: usize) -> Result<PendingCell, SheetError> {
    let column = attribute(e, b"r")?
        .and_then(|r| column_index(&r))
        .unwrap_or(next_column);

    Ok(PendingCell {
        column,
        cell_type: attribute(e, b"t")?,
        ..PendingCell::default()
    })
}
