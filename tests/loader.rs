//! # Loader Integration Tests
//!
//! End-to-end CSV ingestion against real files on disk: parse, average,
//! feed the index, and verify the resulting tree.

use std::fs;

use tempfile::tempdir;

use climdex::loader::{load_into, CsvLoader};
use climdex::tree::AvlIndex;

const DATASET: &str = "\
ISO3,Country,F1961,F1962,F1963
COL,Colombia,24.0,24.5,25.0
USA,United States,12.0,13.0,13.4
BRA,Brazil,26.0,26.2,26.4
CAN,Canada,3.5,,3.9
XXX,No Data,,,
";

#[test]
fn loads_records_from_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("climate.csv");
    fs::write(&path, DATASET).unwrap();

    let records = CsvLoader::new().load(&path).unwrap();

    // XXX has no parseable measures and is dropped.
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].code, "COL");
    assert!((records[0].key - 24.5).abs() < 1e-9);

    // CAN averages over the two present cells only.
    let can = records.iter().find(|r| r.code == "CAN").unwrap();
    assert!((can.key - 3.7).abs() < 1e-9);
}

#[test]
fn loaded_records_build_a_valid_tree() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("climate.csv");
    fs::write(&path, DATASET).unwrap();

    let records = CsvLoader::new().load(&path).unwrap();
    let mut index = AvlIndex::new();
    assert_eq!(load_into(&mut index, &records), 4);

    index.check_invariants();
    assert!(index.find_by_code("usa").is_some());
    assert!(index.find_by_code("XXX").is_none());
}

#[test]
fn missing_file_reports_the_path() {
    let err = CsvLoader::new().load("/no/such/file.csv").unwrap_err();
    assert!(err.to_string().contains("/no/such/file.csv"));
}

#[test]
fn wrong_header_reports_the_missing_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "Code,Name,F1961\nAAA,Alpha,1.0\n").unwrap();

    let err = CsvLoader::new().load(&path).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("ISO3"));
}

#[test]
fn crlf_line_endings_are_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crlf.csv");
    fs::write(&path, "ISO3,Country,F1961\r\nJPN,Japan,16.1\r\n").unwrap();

    let records = CsvLoader::new().load(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].code, "JPN");
    assert!((records[0].key - 16.1).abs() < 1e-9);
}
