//! Dataset ingestion.
//!
//! Readings arrive as whitespace-delimited records, one per line:
//!
//! ```text
//! location year month day time temperature
//! ```
//!
//! The temperature field is a float and is truncated toward zero before any
//! device work; the whole pipeline operates on `i32` samples.
//!
//! The reader iterates until the underlying read fails (end of stream).
//! Trailing blank lines are discarded rather than parsed into a garbage
//! record; a malformed interior record is a hard error naming its line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

/// One temperature reading parsed from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// Weather station identifier
    pub location: String,
    /// Year of the observation
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Day of month
    pub day: u32,
    /// Time of day as recorded (e.g. 2345)
    pub time: u32,
    /// Temperature truncated to an integer
    pub temperature: i32,
}

/// Load all readings from a dataset file.
///
/// A missing or unreadable file is fatal before any device work begins.
pub fn load_readings(path: &Path) -> Result<Vec<Reading>> {
    let file = File::open(path).map_err(|source| Error::Dataset {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "reading dataset, this may take some time");

    let readings = parse_records(BufReader::new(file))?;
    tracing::info!(count = readings.len(), "dataset read complete");
    Ok(readings)
}

/// Parse whitespace-delimited records from a reader.
///
/// Blank lines are skipped so a trailing newline does not produce a partial
/// record. Any other malformed line is a [`Error::Parse`].
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Reading>> {
    let mut readings = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 6 {
            return Err(Error::parse(
                lineno,
                format!("expected 6 fields, found {}", fields.len()),
            ));
        }

        let year: i32 = parse_field(fields[1], "year", lineno)?;
        let month: u32 = parse_field(fields[2], "month", lineno)?;
        let day: u32 = parse_field(fields[3], "day", lineno)?;
        let time: u32 = parse_field(fields[4], "time", lineno)?;
        let temperature: f32 = parse_field(fields[5], "temperature", lineno)?;

        readings.push(Reading {
            location: fields[0].to_string(),
            year,
            month,
            day,
            time,
            // truncation toward zero, matching the device element type
            temperature: temperature as i32,
        });
    }

    Ok(readings)
}

/// Extract the integer temperature column.
pub fn temperatures(readings: &[Reading]) -> Vec<i32> {
    readings.iter().map(|r| r.temperature).collect()
}

fn parse_field<T: std::str::FromStr>(token: &str, name: &str, line: usize) -> Result<T> {
    token
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid {name} field '{token}'")))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Result<Vec<Reading>> {
        parse_records(s.as_bytes())
    }

    #[test]
    fn test_parse_basic_records() {
        let data = "BARKSTON_HEATH 1991 1 1 645 -5.1\nSCAMPTON 1991 1 1 650 2.9\n";
        let readings = parse_str(data).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].location, "BARKSTON_HEATH");
        assert_eq!(readings[0].year, 1991);
        assert_eq!(readings[0].time, 645);
        assert_eq!(readings[1].temperature, 2);
    }

    #[test]
    fn test_temperature_truncates_toward_zero() {
        let data = "A 2000 6 1 1200 -5.9\nB 2000 6 1 1200 5.9\n";
        let readings = parse_str(data).unwrap();
        assert_eq!(readings[0].temperature, -5);
        assert_eq!(readings[1].temperature, 5);
    }

    #[test]
    fn test_trailing_blank_lines_discarded() {
        let data = "A 2000 6 1 1200 10.0\n\n   \n";
        let readings = parse_str(data).unwrap();
        assert_eq!(readings.len(), 1);
    }

    #[test]
    fn test_malformed_record_names_line() {
        let data = "A 2000 6 1 1200 10.0\nB 2000 6 1\n";
        let err = parse_str(data).unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let data = "A 2000 6 1 noon 10.0\n";
        assert!(parse_str(data).is_err());
    }

    #[test]
    fn test_temperatures_column() {
        let data = "A 2000 6 1 1200 5.0\nB 2000 6 1 1200 -3.2\n";
        let readings = parse_str(data).unwrap();
        assert_eq!(temperatures(&readings), vec![5, -3]);
    }
}
