//! Excel importer implementation - Excel (.xlsx) → JSON rows

use crate::error::{RaceError, RaceResult};
use crate::types::{CellValue, Row};
use calamine::{open_workbook, open_workbook_from_rs, Data, ExcelDateTime, Range, Reader, Xlsx};
use serde::Serialize;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// First worksheet of an uploaded workbook, split into header and data rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedSheet {
    pub sheet_name: String,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

impl ImportedSheet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Excel importer for turning .xlsx files into normalized rows
pub struct ExcelImporter;

impl ExcelImporter {
    /// Read the first worksheet of an .xlsx file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> RaceResult<ImportedSheet> {
        let workbook: Xlsx<_> = open_workbook(path.as_ref())
            .map_err(|e| RaceError::Import(format!("Failed to open Excel file: {}", e)))?;
        Self::read_first_sheet(workbook)
    }

    /// Read the first worksheet of an in-memory .xlsx upload
    pub fn from_bytes(bytes: &[u8]) -> RaceResult<ImportedSheet> {
        let workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
            .map_err(|e| RaceError::Import(e.to_string()))?;
        Self::read_first_sheet(workbook)
    }

    fn read_first_sheet<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> RaceResult<ImportedSheet> {
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| RaceError::Import("Workbook has no worksheets".to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| RaceError::Import("Workbook has no worksheets".to_string()))?
            .map_err(|e| RaceError::Import(e.to_string()))?;

        let (header, rows) = split_range(&range);
        Ok(ImportedSheet {
            sheet_name,
            header,
            rows,
        })
    }
}

/// Split a worksheet range into its header (row 0) and normalized data rows.
/// calamine ranges are rectangular, so every data row has the header's width.
fn split_range(range: &Range<Data>) -> (Vec<String>, Vec<Row>) {
    let mut rows = range.rows();

    let header = match rows.next() {
        Some(cells) => cells.iter().map(header_name).collect(),
        None => return (Vec::new(), Vec::new()),
    };

    let data = rows
        .map(|cells| cells.iter().map(normalize_cell).collect())
        .collect();

    (header, data)
}

fn header_name(cell: &Data) -> String {
    normalize_cell(cell).to_string()
}

/// Convert one calamine cell into a JSON-safe value.
///
/// Integral numbers become integers, NaN and infinities become null,
/// anything that is not a number becomes its text.
pub fn normalize_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => normalize_float(*f),
        Data::DateTime(dt) => CellValue::Text(format_excel_datetime(dt)),
        Data::Bool(b) => CellValue::from(*b),
        other => CellValue::Text(other.to_string()),
    }
}

/// xlsx stores every number as a double; whole values come back as integers
pub fn normalize_float(f: f64) -> CellValue {
    if !f.is_finite() {
        return CellValue::Null;
    }
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}

fn format_excel_datetime(dt: &ExcelDateTime) -> String {
    let serial = dt.as_f64();
    if dt.is_duration() || (0.0..1.0).contains(&serial) {
        format_clock(serial)
    } else {
        format_date_time(dt)
    }
}

/// Render a day fraction as `HH:MM:SS`, adding `.mmm` when there are
/// milliseconds. Hours are not wrapped at 24 so durations stay readable.
pub fn format_clock(serial: f64) -> String {
    let sign = if serial < 0.0 { "-" } else { "" };
    let total_ms = (serial.abs() * MILLIS_PER_DAY).round() as u64;

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms / 1_000) % 60;
    let millis = total_ms % 1_000;

    if millis == 0 {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    } else {
        format!(
            "{}{:02}:{:02}:{:02}.{:03}",
            sign, hours, minutes, seconds, millis
        )
    }
}

/// Render a calendar cell as `YYYY-MM-DD HH:MM:SS`.
/// calamine resolves the workbook epoch (1900 or 1904) and the phantom
/// 1900-02-29.
pub fn format_date_time(dt: &ExcelDateTime) -> String {
    let (year, month, day, hour, minute, second, _) = dt.to_ymd_hms_milli();
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, month, day, hour, minute, second
    )
}

/// Reject upload names that cannot be an .xlsx workbook.
/// Only the name is checked; contents are left to the parser.
pub fn check_file_name(name: &str) -> RaceResult<()> {
    if name.is_empty() {
        return Err(RaceError::NoFileSelected);
    }
    if !name.to_lowercase().ends_with(".xlsx") {
        return Err(RaceError::WrongExtension);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTimeType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_empty_is_null() {
        assert_eq!(normalize_cell(&Data::Empty), CellValue::Null);
    }

    #[test]
    fn test_normalize_integral_float_is_int() {
        assert_eq!(normalize_cell(&Data::Float(100.0)), CellValue::Int(100));
        assert_eq!(normalize_cell(&Data::Float(-3.0)), CellValue::Int(-3));
        assert_eq!(normalize_cell(&Data::Int(7)), CellValue::Int(7));
    }

    #[test]
    fn test_normalize_fractional_float() {
        assert_eq!(normalize_cell(&Data::Float(83.45)), CellValue::Float(83.45));
    }

    #[test]
    fn test_normalize_nan_and_infinity_are_null() {
        assert_eq!(normalize_cell(&Data::Float(f64::NAN)), CellValue::Null);
        assert_eq!(normalize_cell(&Data::Float(f64::INFINITY)), CellValue::Null);
        assert_eq!(
            normalize_cell(&Data::Float(f64::NEG_INFINITY)),
            CellValue::Null
        );
    }

    #[test]
    fn test_normalize_huge_float_stays_float() {
        assert_eq!(normalize_cell(&Data::Float(1e20)), CellValue::Float(1e20));
    }

    #[test]
    fn test_normalize_text_bool_and_error() {
        assert_eq!(
            normalize_cell(&Data::String("Team A".to_string())),
            CellValue::Text("Team A".to_string())
        );
        assert_eq!(
            normalize_cell(&Data::Bool(true)),
            CellValue::Text("True".to_string())
        );
        assert_eq!(
            normalize_cell(&Data::Bool(false)),
            CellValue::Text("False".to_string())
        );
        assert_eq!(
            normalize_cell(&Data::Error(CellErrorType::Div0)),
            CellValue::Text("#DIV/0!".to_string())
        );
    }

    #[test]
    fn test_format_clock_lap_time() {
        // 1 minute 23.45 seconds
        let serial = 83.45 / 86_400.0;
        assert_eq!(format_clock(serial), "00:01:23.450");
        assert_eq!(format_clock(0.5), "12:00:00");
    }

    #[test]
    fn test_format_clock_long_duration() {
        assert_eq!(format_clock(1.25), "30:00:00");
        assert_eq!(format_clock(-0.5), "-12:00:00");
    }

    fn date_cell(serial: f64, is_1904: bool) -> Data {
        Data::DateTime(ExcelDateTime::new(
            serial,
            ExcelDateTimeType::DateTime,
            is_1904,
        ))
    }

    #[test]
    fn test_normalize_date_1900_epoch() {
        assert_eq!(
            normalize_cell(&date_cell(45292.0, false)),
            CellValue::Text("2024-01-01 00:00:00".to_string())
        );
        assert_eq!(
            normalize_cell(&date_cell(45292.75, false)),
            CellValue::Text("2024-01-01 18:00:00".to_string())
        );
    }

    #[test]
    fn test_normalize_date_before_phantom_leap_day() {
        assert_eq!(
            normalize_cell(&date_cell(59.0, false)),
            CellValue::Text("1900-02-28 00:00:00".to_string())
        );
        assert_eq!(
            normalize_cell(&date_cell(61.0, false)),
            CellValue::Text("1900-03-01 00:00:00".to_string())
        );
    }

    #[test]
    fn test_normalize_date_1904_epoch() {
        assert_eq!(
            normalize_cell(&date_cell(43830.0, true)),
            CellValue::Text("2024-01-01 00:00:00".to_string())
        );
    }

    #[test]
    fn test_normalize_time_only_and_duration() {
        assert_eq!(
            normalize_cell(&date_cell(0.5, false)),
            CellValue::Text("12:00:00".to_string())
        );
        let lap = Data::DateTime(ExcelDateTime::new(
            83.45 / 86_400.0,
            ExcelDateTimeType::TimeDelta,
            false,
        ));
        assert_eq!(normalize_cell(&lap), CellValue::Text("00:01:23.450".to_string()));
    }

    #[test]
    fn test_check_file_name() {
        assert!(check_file_name("results.xlsx").is_ok());
        assert!(check_file_name("RESULTS.XLSX").is_ok());
        assert!(matches!(
            check_file_name(""),
            Err(RaceError::NoFileSelected)
        ));
        assert!(matches!(
            check_file_name("results.xls"),
            Err(RaceError::WrongExtension)
        ));
        assert!(matches!(
            check_file_name("results.csv"),
            Err(RaceError::WrongExtension)
        ));
        assert!(matches!(
            check_file_name("xlsx"),
            Err(RaceError::WrongExtension)
        ));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = ExcelImporter::from_bytes(b"definitely not a zip archive").unwrap_err();
        assert!(matches!(err, RaceError::Import(_)));
        assert!(err.to_string().starts_with("Error processing file: "));
    }
}
