use crate::error::{ReportError, Result};
use crate::models::{Centroid, FireRecord};
use crate::processors::LoadReport;
use crate::utils::constants::*;
use chrono::{DateTime, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use validator::Validate;

/// Records that survived parsing plus the account of what was skipped
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: Vec<FireRecord>,
    pub report: LoadReport,
}

/// Positions of the required columns in the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    year: usize,
    state: usize,
    municipality_id: usize,
    biome: usize,
    detection_id: usize,
    occurrence_id: usize,
    timestamp: usize,
    centroid: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&name| position(name).is_none())
            .map(|&name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ReportError::SchemaMismatch { missing });
        }

        let index = |name: &str| position(name).unwrap_or_default();

        Ok(Self {
            year: index(COL_YEAR),
            state: index(COL_STATE),
            municipality_id: index(COL_MUNICIPALITY_ID),
            biome: index(COL_BIOME),
            detection_id: index(COL_DETECTION_ID),
            occurrence_id: index(COL_OCCURRENCE_ID),
            timestamp: index(COL_TIMESTAMP),
            centroid: index(COL_CENTROID),
        })
    }
}

/// Centroid column outcome for one row
enum CentroidField {
    Valid(Centroid),
    Empty,
    Invalid(String),
}

pub struct RecordReader {
    delimiter: u8,
}

impl RecordReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load fire records from a CSV file.
    ///
    /// Unreadable files and missing columns are fatal. Rows with an unusable
    /// required field are skipped and listed in the returned report.
    pub fn load_records(&self, path: &Path) -> Result<LoadOutcome> {
        let bytes = fs::read(path).map_err(|source| ReportError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let text = decode_text(bytes);
        let outcome = self.load_records_from_str(&text)?;

        info!(
            path = %path.display(),
            loaded = outcome.report.loaded_records,
            skipped = outcome.report.skipped_count(),
            "loaded fire records"
        );

        Ok(outcome)
    }

    pub fn load_records_from_str(&self, text: &str) -> Result<LoadOutcome> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let columns = ColumnIndex::from_headers(reader.headers()?)?;

        let mut records = Vec::new();
        let mut report = LoadReport::new();

        for (index, row_result) in reader.records().enumerate() {
            // Header is line 1
            let fallback_line = index as u64 + 2;

            let row = match row_result {
                Ok(row) => row,
                Err(e) => {
                    let line = e
                        .position()
                        .map_or(fallback_line, |position| position.line());
                    warn!(line, error = %e, "skipping malformed CSV row");
                    report.record_skipped(line, e.to_string());
                    continue;
                }
            };

            let line = row
                .position()
                .map_or(fallback_line, |position| position.line());

            match self.parse_row(&row, &columns, line) {
                Ok((record, centroid_field)) => {
                    match centroid_field {
                        CentroidField::Valid(_) => {}
                        CentroidField::Empty => report.missing_centroids += 1,
                        CentroidField::Invalid(reason) => {
                            debug!(line, %reason, "dropping malformed centroid");
                            report.invalid_centroids += 1;
                        }
                    }
                    report.record_loaded();
                    records.push(record);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(line, error = %e, "skipping record");
                    report.record_skipped(line, e.to_string());
                }
            }
        }

        if report.skipped_count() > 0 {
            warn!(
                skipped = report.skipped_count(),
                "some rows could not be parsed and were skipped"
            );
        }

        Ok(LoadOutcome { records, report })
    }

    /// Parse a single CSV row into a record
    fn parse_row(
        &self,
        row: &StringRecord,
        columns: &ColumnIndex,
        line: u64,
    ) -> Result<(FireRecord, CentroidField)> {
        let field = |index: usize| row.get(index).unwrap_or("");
        let parse_error = |message: String| ReportError::RecordParse { line, message };

        let year_str = field(columns.year);
        let year = parse_integer(year_str)
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| parse_error(format!("Invalid year: '{}'", year_str)))?;

        let state_code = field(columns.state).to_uppercase();
        if state_code.is_empty() {
            return Err(parse_error("Missing state code".to_string()));
        }

        let municipality_str = field(columns.municipality_id);
        let municipality_id = parse_integer(municipality_str)
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| {
                parse_error(format!("Invalid municipality id: '{}'", municipality_str))
            })?;

        let timestamp_str = field(columns.timestamp);
        let timestamp = parse_timestamp(timestamp_str)
            .ok_or_else(|| parse_error(format!("Invalid timestamp: '{}'", timestamp_str)))?;

        let biome = Some(field(columns.biome))
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        let centroid_str = field(columns.centroid);
        let centroid_field = if centroid_str.is_empty() {
            CentroidField::Empty
        } else {
            match Centroid::from_wkt(centroid_str) {
                Ok(centroid) => CentroidField::Valid(centroid),
                Err(e) => CentroidField::Invalid(e.to_string()),
            }
        };
        let centroid = match &centroid_field {
            CentroidField::Valid(centroid) => Some(*centroid),
            _ => None,
        };

        let record = FireRecord::new(
            year,
            state_code,
            municipality_id,
            biome,
            field(columns.detection_id).to_string(),
            field(columns.occurrence_id).to_string(),
            timestamp,
            centroid,
        );

        record
            .validate()
            .map_err(|e| parse_error(format!("Validation failed: {}", e)))?;

        Ok((record, centroid_field))
    }
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode file bytes as UTF-8, falling back to Windows-1252 for Latin-1 exports
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = WINDOWS_1252.decode(e.as_bytes());
            decoded.into_owned()
        }
    }
}

/// Parse an integer column, tolerating float renderings such as `5107925.0`
fn parse_integer(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Parse a `data_hora` value; offsets are normalised to UTC
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "ano,sigla_uf,id_municipio,bioma,id_bdq,id_foco,data_hora,centroide";

    #[test]
    fn test_parse_timestamp_formats() {
        let plain = parse_timestamp("2020-09-14 17:25:00").unwrap();
        assert_eq!((plain.month(), plain.hour()), (9, 17));

        assert!(parse_timestamp("2020-09-14T17:25:00").is_some());
        assert!(parse_timestamp("2020-09-14 17:25:00.123").is_some());

        let offset = parse_timestamp("2020-09-14T17:25:00-03:00").unwrap();
        assert_eq!(offset.hour(), 20);

        assert!(parse_timestamp("14/09/2020").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_parse_integer_accepts_float_rendering() {
        assert_eq!(parse_integer("5107925"), Some(5107925));
        assert_eq!(parse_integer("5107925.0"), Some(5107925));
        assert_eq!(parse_integer("5107925.5"), None);
        assert_eq!(parse_integer("abc"), None);
    }

    #[test]
    fn test_load_records_from_str() {
        let csv = format!(
            "{}\n\
             2020,PA,1500107,Amazônia,101,9001,2020-08-10 14:00:00,POINT(-48.88 -1.72)\n\
             2020,pa,1500107,,102,9002,2020-08-11 02:00:00,\n\
             2021,MT,5107925,Cerrado,103,9003,2021-09-01 18:30:00,POINT(-55.8 -12.6)\n",
            HEADER
        );

        let outcome = RecordReader::new().load_records_from_str(&csv).unwrap();

        assert_eq!(outcome.records.len(), 3);
        assert_eq!(outcome.report.loaded_records, 3);
        assert_eq!(outcome.report.missing_centroids, 1);

        let first = &outcome.records[0];
        assert_eq!(first.year, 2020);
        assert_eq!(first.state_code, "PA");
        assert_eq!(first.biome.as_deref(), Some("Amazônia"));
        assert_eq!(first.centroid, Some(Centroid::new(-48.88, -1.72)));
        assert_eq!(first.municipality_name, None);

        let second = &outcome.records[1];
        assert_eq!(second.state_code, "PA");
        assert_eq!(second.biome, None);
        assert_eq!(second.centroid, None);
    }

    #[test]
    fn test_bad_rows_are_skipped_and_counted() {
        let csv = format!(
            "{}\n\
             2020,PA,1500107,Amazônia,101,9001,not-a-date,POINT(-48.88 -1.72)\n\
             2020,PA,1500107,Amazônia,102,9002,2020-08-11 02:00:00,POINT(garbage)\n\
             20x0,PA,1500107,Amazônia,103,9003,2020-08-11 02:00:00,POINT(-48.88 -1.72)\n\
             2020,PAR,1500107,Amazônia,104,9004,2020-08-11 02:00:00,POINT(-48.88 -1.72)\n\
             2020,PA,1500107,Amazônia,105,9005,2020-08-12 03:00:00,POINT(-48.88 -1.72)\n",
            HEADER
        );

        let outcome = RecordReader::new().load_records_from_str(&csv).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.report.total_rows, 5);
        assert_eq!(outcome.report.skipped_count(), 3);
        assert_eq!(outcome.report.invalid_centroids, 1);

        let lines: Vec<u64> = outcome.report.skipped_rows.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
        assert!(outcome.report.skipped_rows[0].reason.contains("Invalid timestamp"));

        // Row with the malformed centroid is kept without one
        assert_eq!(outcome.records[0].detection_id, "102");
        assert_eq!(outcome.records[0].centroid, None);
    }

    #[test]
    fn test_missing_centroid_column_is_schema_mismatch() {
        let csv = "ano,sigla_uf,id_municipio,bioma,id_bdq,id_foco,data_hora\n\
                   2020,PA,1500107,Amazônia,101,9001,2020-08-10 14:00:00\n";

        let result = RecordReader::new().load_records_from_str(csv);

        match result {
            Err(ReportError::SchemaMismatch { missing }) => {
                assert_eq!(missing, vec!["centroide".to_string()])
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_columns_may_be_reordered_and_extended() {
        let csv = "centroide,data_hora,id_foco,id_bdq,bioma,id_municipio,sigla_uf,ano,extra\n\
                   POINT(-48.88 -1.72),2020-08-10 14:00:00,9001,101,Amazônia,1500107,PA,2020,x\n";

        let outcome = RecordReader::new().load_records_from_str(csv).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].municipality_id, 1500107);
    }

    #[test]
    fn test_load_records_missing_file() {
        let result = RecordReader::new().load_records(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(ReportError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_load_records_latin1_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        // "Amazônia" in Windows-1252
        temp_file.write_all(b"2020,PA,1500107,Amaz\xf4nia,101,9001,2020-08-10 14:00:00,POINT(-48.88 -1.72)\n")?;
        temp_file.flush()?;

        let outcome = RecordReader::new().load_records(temp_file.path())?;

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].biome.as_deref(), Some("Amazônia"));

        Ok(())
    }
}
