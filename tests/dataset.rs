//! Dataset loading tests against real files.

use std::io::Write;

use tempr::dataset::{load_readings, temperatures};
use tempr::error::Error;

#[test]
fn test_load_readings_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "BARKSTON_HEATH 1991 1 1 645 -5.1").unwrap();
    writeln!(file, "SCAMPTON 1991 1 1 650 2.9").unwrap();
    writeln!(file, "WADDINGTON 1991 1 1 659 8.5").unwrap();
    file.flush().unwrap();

    let readings = load_readings(file.path()).unwrap();
    assert_eq!(readings.len(), 3);
    assert_eq!(temperatures(&readings), vec![-5, 2, 8]);
}

#[test]
fn test_trailing_newline_produces_no_garbage_record() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    // Trailing newline plus a blank line; neither may become a record.
    write!(file, "A 2000 6 1 1200 10.0\n\n").unwrap();
    file.flush().unwrap();

    let readings = load_readings(file.path()).unwrap();
    assert_eq!(readings.len(), 1);
}

#[test]
fn test_missing_file_is_fatal_before_device_work() {
    let err = load_readings(std::path::Path::new("no_such_dataset.txt")).unwrap_err();
    assert!(matches!(err, Error::Dataset { .. }));
}

#[test]
fn test_malformed_record_reports_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "A 2000 6 1 1200 10.0").unwrap();
    writeln!(file, "B 2000 six 1 1200 10.0").unwrap();
    file.flush().unwrap();

    let err = load_readings(file.path()).unwrap_err();
    match err {
        Error::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("expected Parse error, got {other:?}"),
    }
}
