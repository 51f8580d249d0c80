//! Bore joint sheets

use std::path::Path;

use super::{convert_rows, ColumnMap, DatasetKind, FieldSpec, ParseError, Parsed};
use crate::sheet::{read_sheet, Sheet};
use crate::types::BoreJoint;

/// Canonical bore columns and their accepted header spellings.
pub const BORE_FIELDS: &[FieldSpec] = &[
    FieldSpec { canonical: "Joint #", synonyms: &["Joint #", "Joint"] },
    FieldSpec { canonical: "Length", synonyms: &["Length"] },
    FieldSpec { canonical: "Inclination", synonyms: &["Inclination"] },
    FieldSpec { canonical: "L/R", synonyms: &["L/R"] },
    FieldSpec { canonical: "Raw Azi.", synonyms: &["Raw Azi.", "Raw Azimuth", "Azimuth", "RawAzi"] },
    FieldSpec { canonical: "Away", synonyms: &["Away"] },
    FieldSpec { canonical: "Elev.", synonyms: &["Elev.", "Elevation", "Elev"] },
];

const JOINT: usize = 0;
const LENGTH: usize = 1;
const INCLINATION: usize = 2;
const LEFT_RIGHT: usize = 3;
const RAW_AZIMUTH: usize = 4;
const AWAY: usize = 5;
const ELEVATION: usize = 6;

/// Parse a bore sheet into joints. All seven columns are required; joint
/// number, station and elevation are mandatory per row.
pub fn parse_bore_sheet(sheet: &Sheet) -> Result<Parsed<BoreJoint>, ParseError> {
    let kind = DatasetKind::Bore;
    let Some(header) = sheet.header().filter(|_| sheet.rows.len() >= 2) else {
        return Err(ParseError::EmptyDataset { kind });
    };

    let map = ColumnMap::from_header(header, BORE_FIELDS);
    map.require_all(kind)?;

    convert_rows(sheet.data_rows(), kind, |row_number, cells| {
        let row = map.row(row_number, cells);
        let joint_number = row.whole_number(JOINT)?;
        let station_ft = row.number(AWAY)?;
        let elevation_ft = row.number(ELEVATION)?;

        Ok(BoreJoint {
            joint_number,
            length_ft: row.number_or_zero(LENGTH),
            inclination_deg: row.number_or_zero(INCLINATION),
            left_right_offset_ft: row.number_or_zero(LEFT_RIGHT),
            raw_azimuth_deg: row.number_or_zero(RAW_AZIMUTH),
            station_ft,
            elevation_ft,
        })
    })
}

/// Read and parse a bore file.
pub async fn load_bore(path: impl AsRef<Path>) -> Result<Parsed<BoreJoint>, ParseError> {
    let path = path.as_ref();
    let sheet = read_sheet(path).await?;
    let parsed = parse_bore_sheet(&sheet)?;

    tracing::info!(
        file = %path.display(),
        joints = parsed.records.len(),
        dropped = parsed.dropped_rows.len(),
        "Loaded bore data"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    fn header(names: &[&str]) -> Vec<Cell> {
        names.iter().map(|n| Cell::Text((*n).to_string())).collect()
    }

    fn nums(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(*v)).collect()
    }

    #[test]
    fn test_parse_with_synonyms() {
        let sheet = Sheet::new(
            "bore",
            vec![
                header(&["Joint", "Length", "Inclination", "L/R", "Azimuth", "Away", "Elevation"]),
                nums(&[1.0, 15.0, -12.0, 0.5, 90.0, 0.0, 100.0]),
                nums(&[2.0, 15.0, -10.0, -1.2, 91.0, 14.7, 96.9]),
            ],
        );

        let parsed = parse_bore_sheet(&sheet).expect("parse");
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.dropped_rows.is_empty());

        let second = &parsed.records[1];
        assert_eq!(second.joint_number, 2);
        assert!((second.left_right_offset_ft + 1.2).abs() < 1e-12);
        assert!((second.raw_azimuth_deg - 91.0).abs() < 1e-12);
        assert!((second.station_ft - 14.7).abs() < 1e-12);
    }

    #[test]
    fn test_missing_one_header_names_it() {
        let sheet = Sheet::new(
            "bore",
            vec![
                header(&["Joint #", "Length", "Inclination", "Raw Azi.", "Away", "Elev."]),
                nums(&[1.0, 15.0, -12.0, 90.0, 0.0, 100.0]),
            ],
        );

        match parse_bore_sheet(&sheet) {
            Err(ParseError::MissingColumns { kind, missing }) => {
                assert_eq!(kind, DatasetKind::Bore);
                assert_eq!(missing, vec!["L/R".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_optional_fields_default_to_zero() {
        let sheet = Sheet::new(
            "bore",
            vec![
                header(&["Joint #", "Length", "Inclination", "L/R", "Raw Azi.", "Away", "Elev."]),
                vec![
                    Cell::Number(3.0),
                    Cell::Text("n/a".into()),
                    Cell::Empty,
                    Cell::Text(" ".into()),
                    Cell::Empty,
                    Cell::Text("45.5".into()),
                    Cell::Number(88.0),
                ],
            ],
        );

        let parsed = parse_bore_sheet(&sheet).expect("parse");
        let joint = &parsed.records[0];
        assert_eq!(joint.joint_number, 3);
        assert!(joint.length_ft.abs() < f64::EPSILON);
        assert!(joint.left_right_offset_ft.abs() < f64::EPSILON);
        assert!((joint.station_ft - 45.5).abs() < 1e-12);
    }

    #[test]
    fn test_mandatory_failure_drops_row() {
        let sheet = Sheet::new(
            "bore",
            vec![
                header(&["Joint #", "Length", "Inclination", "L/R", "Raw Azi.", "Away", "Elev."]),
                nums(&[1.0, 15.0, 0.0, 0.0, 0.0, 0.0, 100.0]),
                vec![
                    Cell::Number(2.0),
                    Cell::Number(15.0),
                    Cell::Number(0.0),
                    Cell::Number(0.0),
                    Cell::Number(0.0),
                    Cell::Text("15+00".into()),
                    Cell::Number(99.0),
                ],
            ],
        );

        let parsed = parse_bore_sheet(&sheet).expect("parse");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.dropped_rows.len(), 1);
        assert_eq!(parsed.dropped_rows[0].field, "Away");
        assert_eq!(parsed.dropped_rows[0].row, 3);
    }

    #[test]
    fn test_fractional_joint_number_drops_row() {
        let sheet = Sheet::new(
            "bore",
            vec![
                header(&["Joint #", "Length", "Inclination", "L/R", "Raw Azi.", "Away", "Elev."]),
                nums(&[12.0, 15.0, 0.0, 0.0, 0.0, 0.0, 100.0]),
                nums(&[12.5, 15.0, 0.0, 0.0, 0.0, 7.5, 99.5]),
                nums(&[1e300, 15.0, 0.0, 0.0, 0.0, 15.0, 99.0]),
            ],
        );

        let parsed = parse_bore_sheet(&sheet).expect("parse");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].joint_number, 12);

        let dropped = &parsed.dropped_rows;
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[0].row, 3);
        assert_eq!(dropped[0].field, "Joint #");
        assert_eq!(dropped[0].to_string(), "row 3: 'Joint #' value '12.5' is not a whole number");
        assert_eq!(dropped[1].row, 4);
    }

    #[test]
    fn test_header_only_sheet_is_empty_dataset() {
        let sheet = Sheet::new(
            "bore",
            vec![header(&["Joint #", "Length", "Inclination", "L/R", "Raw Azi.", "Away", "Elev."])],
        );
        assert!(matches!(
            parse_bore_sheet(&sheet),
            Err(ParseError::EmptyDataset { kind: DatasetKind::Bore })
        ));
    }
}
