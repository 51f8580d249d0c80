//! Surface terrain sheets

use std::path::Path;

use super::{convert_rows, ColumnMap, DatasetKind, FieldSpec, ParseError, Parsed};
use crate::sheet::{read_sheet, Sheet};
use crate::types::SurfacePoint;

pub const SURFACE_FIELDS: &[FieldSpec] = &[
    FieldSpec { canonical: "Station", synonyms: &["Station", "STATION", "STA"] },
    FieldSpec { canonical: "Elevation", synonyms: &["Elevation", "ELEVATION", "ELEV"] },
];

const STATION: usize = 0;
const ELEVATION: usize = 1;

/// Parse a surface sheet into terrain points (offset always 0).
pub fn parse_surface_sheet(sheet: &Sheet) -> Result<Parsed<SurfacePoint>, ParseError> {
    let kind = DatasetKind::Surface;
    let Some(header) = sheet.header().filter(|_| sheet.rows.len() >= 2) else {
        return Err(ParseError::EmptyDataset { kind });
    };

    let map = ColumnMap::from_header(header, SURFACE_FIELDS);
    map.require_all(kind)?;

    convert_rows(sheet.data_rows(), kind, |row_number, cells| {
        let row = map.row(row_number, cells);
        Ok(SurfacePoint::new(row.number(STATION)?, row.number(ELEVATION)?))
    })
}

/// Read and parse a surface file.
pub async fn load_surface(path: impl AsRef<Path>) -> Result<Parsed<SurfacePoint>, ParseError> {
    let path = path.as_ref();
    let sheet = read_sheet(path).await?;
    let parsed = parse_surface_sheet(&sheet)?;

    tracing::info!(
        file = %path.display(),
        points = parsed.records.len(),
        dropped = parsed.dropped_rows.len(),
        "Loaded surface data"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    #[test]
    fn test_parse_uppercase_synonyms() {
        let sheet = Sheet::new(
            "surface",
            vec![
                vec![Cell::Text("STA".into()), Cell::Text("ELEV".into()), Cell::Text("Notes".into())],
                vec![Cell::Number(0.0), Cell::Number(101.2), Cell::Text("bank".into())],
                vec![Cell::Text("50".into()), Cell::Text(" 99.8".into()), Cell::Empty],
            ],
        );

        let parsed = parse_surface_sheet(&sheet).expect("parse");
        assert_eq!(parsed.records.len(), 2);
        assert!((parsed.records[1].station_ft - 50.0).abs() < 1e-12);
        assert!((parsed.records[1].elevation_ft - 99.8).abs() < 1e-12);
        assert!(parsed.records.iter().all(|p| p.offset_ft.abs() < f64::EPSILON));
    }

    #[test]
    fn test_missing_both_columns() {
        let sheet = Sheet::new(
            "surface",
            vec![
                vec![Cell::Text("station".into()), Cell::Text("height".into())],
                vec![Cell::Number(0.0), Cell::Number(1.0)],
            ],
        );

        match parse_surface_sheet(&sheet) {
            Err(ParseError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["Station".to_string(), "Elevation".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_all_rows_invalid_is_empty_dataset() {
        let sheet = Sheet::new(
            "surface",
            vec![
                vec![Cell::Text("Station".into()), Cell::Text("Elevation".into())],
                vec![Cell::Text("x".into()), Cell::Number(1.0)],
            ],
        );
        assert!(matches!(
            parse_surface_sheet(&sheet),
            Err(ParseError::EmptyDataset { kind: DatasetKind::Surface })
        ));
    }
}
