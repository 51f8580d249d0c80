//! CSV decoding
//!
//! Quote-aware record splitting: commas and line breaks inside quoted
//! fields are kept, doubled quotes inside a quoted field unescape to one.

use super::{Cell, Sheet, SheetError};

/// Split CSV text into records of raw (unquoted) field strings.
pub fn split_csv_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || !fields.is_empty() {
        fields.push(current);
        records.push(fields);
    }

    records
}

/// Classify a raw CSV field into a typed cell.
fn to_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return Cell::Number(v);
        }
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }
    Cell::Text(raw.to_string())
}

/// Decode CSV bytes into a single sheet named `name`.
pub fn decode_csv(bytes: &[u8], name: &str) -> Result<Sheet, SheetError> {
    let text = std::str::from_utf8(bytes).map_err(|_| SheetError::Encoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let rows = split_csv_records(text)
        .into_iter()
        .map(|record| record.iter().map(|f| to_cell(f)).collect())
        .collect();

    Ok(Sheet::new(name, rows))
}
