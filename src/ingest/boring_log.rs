//! Boring log sheets
//!
//! Boring logs usually arrive as one workbook per boring, so besides the
//! single-sheet parser this module handles batches: files are processed in
//! list order, surviving rows are concatenated and tagged with their origin
//! file, and a bad file is skipped with a warning instead of failing the run.

use std::path::Path;

use super::{
    convert_rows, ColumnMap, DatasetKind, FieldSpec, FileSkippedWarning, ParseError, Parsed,
    RowConversionWarning,
};
use crate::sheet::{read_sheet, Sheet, SheetError};
use crate::soil::classify_soil;
use crate::types::BoringLogLayer;

pub const BORING_LOG_FIELDS: &[FieldSpec] = &[
    FieldSpec { canonical: "STA", synonyms: &["STA"] },
    FieldSpec {
        canonical: "Zone Start Elevation",
        synonyms: &["Zone Start Elevation (ft)", "Zone Start Elevation"],
    },
    FieldSpec {
        canonical: "Zone End Elevation",
        synonyms: &["Zone End Elevation (ft)", "Zone End Elevation"],
    },
    FieldSpec {
        canonical: "Soil Description",
        synonyms: &["Soil Description per Geotech Logs / Report", "Soil Description"],
    },
];

const STATION: usize = 0;
const START: usize = 1;
const END: usize = 2;
const DESCRIPTION: usize = 3;

/// Combined result of a multi-file boring log load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoringLogBatch {
    pub layers: Vec<BoringLogLayer>,
    pub dropped_rows: Vec<(String, RowConversionWarning)>,
    pub skipped_files: Vec<FileSkippedWarning>,
}

impl BoringLogBatch {
    /// Number of files that contributed at least one layer
    pub fn file_count(&self) -> usize {
        let mut files: Vec<&str> = self.layers.iter().map(|l| l.source_file.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }
}

/// Parse one boring log sheet, tagging every layer with `file_name`.
pub fn parse_boring_log_sheet(sheet: &Sheet, file_name: &str) -> Result<Parsed<BoringLogLayer>, ParseError> {
    let kind = DatasetKind::BoringLog;
    let Some(header) = sheet.header().filter(|_| sheet.rows.len() >= 2) else {
        return Err(ParseError::EmptyDataset { kind });
    };

    let map = ColumnMap::from_header(header, BORING_LOG_FIELDS);
    map.require_all(kind)?;

    convert_rows(sheet.data_rows(), kind, |row_number, cells| {
        let row = map.row(row_number, cells);
        let station_ft = row.number(STATION)?;
        let start_elevation_ft = row.number(START)?;
        let end_elevation_ft = row.number(END)?;
        let soil_description = row.text(DESCRIPTION)?;

        Ok(BoringLogLayer {
            station_ft,
            start_elevation_ft,
            end_elevation_ft,
            color_code: classify_soil(&soil_description).to_string(),
            soil_description,
            source_file: file_name.to_string(),
        })
    })
}

/// Fold already-read sheets into a batch. Each entry is the file name and
/// either its decoded sheet or the error that prevented decoding.
///
/// Layers are tagged with a name unique within the batch: a repeated name
/// gets a ` (2)`, ` (3)` ... suffix.
pub fn parse_boring_log_batch(
    files: impl IntoIterator<Item = (String, Result<Sheet, SheetError>)>,
) -> Result<BoringLogBatch, ParseError> {
    let mut batch = BoringLogBatch::default();
    let mut names: Vec<String> = Vec::new();

    for (file, sheet) in files {
        let file = unique_name(&names, file);
        names.push(file.clone());

        let outcome = sheet
            .map_err(ParseError::from)
            .and_then(|sheet| parse_boring_log_sheet(&sheet, &file));

        match outcome {
            Ok(parsed) => {
                tracing::info!(
                    file = %file,
                    layers = parsed.records.len(),
                    dropped = parsed.dropped_rows.len(),
                    "Loaded boring log"
                );
                batch.layers.extend(parsed.records);
                batch
                    .dropped_rows
                    .extend(parsed.dropped_rows.into_iter().map(|w| (file.clone(), w)));
            }
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "Skipping boring log file");
                batch.skipped_files.push(FileSkippedWarning {
                    file,
                    reason: e.to_string(),
                });
            }
        }
    }

    if batch.layers.is_empty() {
        return Err(ParseError::AllFilesFailed { files: names });
    }

    Ok(batch)
}

fn unique_name(taken: &[String], name: String) -> String {
    if !taken.contains(&name) {
        return name;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{name} ({n})");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Display names for a list of files: the bare file name, or the full path
/// when another file in the list has the same bare name.
pub fn batch_file_names<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let bare = |path: &Path| path.file_name().and_then(|n| n.to_str()).map(str::to_string);
    let bare_names: Vec<Option<String>> = paths.iter().map(|p| bare(p.as_ref())).collect();

    paths
        .iter()
        .zip(&bare_names)
        .map(|(path, name)| match name {
            Some(n) if bare_names.iter().filter(|other| other.as_ref() == Some(n)).count() == 1 => n.clone(),
            _ => path.as_ref().display().to_string(),
        })
        .collect()
}

/// Read boring log files one after another and parse them as a batch.
pub async fn load_boring_logs<P: AsRef<Path>>(paths: &[P]) -> Result<BoringLogBatch, ParseError> {
    let mut sheets = Vec::with_capacity(paths.len());

    for (path, name) in paths.iter().zip(batch_file_names(paths)) {
        sheets.push((name, read_sheet(path.as_ref()).await));
    }

    let batch = parse_boring_log_batch(sheets)?;
    tracing::info!(
        files = paths.len(),
        layers = batch.layers.len(),
        skipped = batch.skipped_files.len(),
        "Boring log batch complete"
    );
    Ok(batch)
}
