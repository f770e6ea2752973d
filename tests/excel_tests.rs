//! Excel import/export tests against real .xlsx files on disk

use pretty_assertions::assert_eq;
use race_scorer::excel::{ExcelExporter, ExcelImporter};
use race_scorer::types::{CellValue, Row, SchemaVariant, Table};
use race_scorer::RaceError;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn team_row(team: &str, points: i64) -> Row {
    vec![
        team.into(),
        "1:20.00".into(),
        "1:21.00".into(),
        "1:22.00".into(),
        "4:03.00".into(),
        CellValue::Int(0),
        CellValue::Int(points),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORTER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_creates_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.xlsx");

    let table = Table::from_schema(SchemaVariant::Basic, vec![team_row("Team A", 100)]).unwrap();
    ExcelExporter::new().write(&table, &path).unwrap();

    assert!(path.exists());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn test_export_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.xlsx");
    std::fs::write(&path, b"stale").unwrap();

    let table = Table::from_schema(SchemaVariant::Basic, vec![team_row("Team A", 100)]).unwrap();
    ExcelExporter::new().write(&table, &path).unwrap();

    let sheet = ExcelImporter::open(&path).unwrap();
    assert_eq!(sheet.rows, vec![team_row("Team A", 100)]);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("results.xlsx");

    let table = Table::from_schema(SchemaVariant::Basic, Vec::new()).unwrap();
    let err = ExcelExporter::new().write(&table, &path).unwrap_err();
    assert!(matches!(err, RaceError::Export(_)));
    assert!(err.to_string().starts_with("Error generating file: "));
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORTER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_round_trip_many_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.xlsx");

    let rows: Vec<Row> = (0..50)
        .map(|i| team_row(&format!("Team {}", i), 100 - i))
        .collect();
    let table = Table::from_schema(SchemaVariant::Basic, rows.clone()).unwrap();
    ExcelExporter::new().write(&table, &path).unwrap();

    let sheet = ExcelImporter::open(&path).unwrap();
    assert_eq!(sheet.row_count(), 50);
    assert_eq!(sheet.header, SchemaVariant::Basic.columns().to_vec());
    assert_eq!(sheet.rows, rows);
}

#[test]
fn test_import_reads_first_sheet_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("two_sheets.xlsx");

    let mut workbook = Workbook::new();
    let first = workbook.add_worksheet();
    first.set_name("Results").unwrap();
    first.write_string(0, 0, "Participation Team").unwrap();
    first.write_string(1, 0, "Team A").unwrap();
    let second = workbook.add_worksheet();
    second.set_name("Notes").unwrap();
    second.write_string(0, 0, "Note").unwrap();
    second.write_string(1, 0, "ignored").unwrap();
    second.write_string(2, 0, "ignored too").unwrap();
    workbook.save(&path).unwrap();

    let sheet = ExcelImporter::open(&path).unwrap();
    assert_eq!(sheet.sheet_name, "Results");
    assert_eq!(sheet.rows, vec![vec![CellValue::Text("Team A".into())]]);
}

#[test]
fn test_import_empty_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.xlsx");

    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(&path).unwrap();

    let sheet = ExcelImporter::open(&path).unwrap();
    assert!(sheet.header.is_empty());
    assert!(sheet.rows.is_empty());
}

#[test]
fn test_import_numeric_header_is_text() {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet();
    ws.write_number(0, 0, 2024.0).unwrap();
    ws.write_string(0, 1, "Team").unwrap();
    ws.write_number(1, 0, 1.0).unwrap();
    ws.write_string(1, 1, "Team A").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let sheet = ExcelImporter::from_bytes(&bytes).unwrap();
    assert_eq!(sheet.header, vec!["2024".to_string(), "Team".to_string()]);
    assert_eq!(
        sheet.rows,
        vec![vec![CellValue::Int(1), CellValue::Text("Team A".into())]]
    );
}

#[test]
fn test_import_missing_file() {
    let err = ExcelImporter::open("does/not/exist.xlsx").unwrap_err();
    assert!(matches!(err, RaceError::Import(_)));
}
