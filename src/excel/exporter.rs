//! Excel exporter implementation - table rows → Excel (.xlsx)

use crate::error::{RaceError, RaceResult};
use crate::types::{CellValue, Table};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Excel exporter writing a single-sheet workbook with a bold header row
/// and no index column
pub struct ExcelExporter {
    sheet_name: String,
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Write the table to an .xlsx file, replacing anything at `output_path`
    pub fn write(&self, table: &Table, output_path: &Path) -> RaceResult<()> {
        let mut workbook = self.build(table)?;
        workbook
            .save(output_path)
            .map_err(|e| RaceError::Export(format!("Failed to save Excel file: {}", e)))
    }

    /// Serialize the table to .xlsx bytes in memory
    pub fn to_buffer(&self, table: &Table) -> RaceResult<Vec<u8>> {
        let mut workbook = self.build(table)?;
        workbook
            .save_to_buffer()
            .map_err(|e| RaceError::Export(format!("Failed to serialize workbook: {}", e)))
    }

    fn build(&self, table: &Table) -> RaceResult<Workbook> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| RaceError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (col_idx, name) in table.columns().iter().enumerate() {
            worksheet
                .write_string_with_format(0, column_index(col_idx)?, name, &header_format)
                .map_err(|e| RaceError::Export(format!("Failed to write header: {}", e)))?;
        }

        // Data starts right under the header
        for (row_idx, row) in table.rows().iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| RaceError::Export("Too many rows for a worksheet".to_string()))?;

            for (col_idx, cell) in row.iter().enumerate() {
                Self::write_cell(worksheet, excel_row, column_index(col_idx)?, cell)?;
            }
        }

        worksheet.autofit();

        Ok(workbook)
    }

    /// Write a single cell; nulls and non-finite numbers stay blank
    fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> RaceResult<()> {
        match cell {
            CellValue::Null => {}
            CellValue::Int(i) => {
                worksheet
                    .write_number(row, col, *i as f64)
                    .map_err(|e| RaceError::Export(format!("Failed to write number: {}", e)))?;
            }
            CellValue::Float(f) if f.is_finite() => {
                worksheet
                    .write_number(row, col, *f)
                    .map_err(|e| RaceError::Export(format!("Failed to write number: {}", e)))?;
            }
            CellValue::Float(_) => {}
            CellValue::Text(s) => {
                worksheet
                    .write_string(row, col, s)
                    .map_err(|e| RaceError::Export(format!("Failed to write text: {}", e)))?;
            }
        }
        Ok(())
    }
}

fn column_index(idx: usize) -> RaceResult<u16> {
    u16::try_from(idx).map_err(|_| RaceError::Export("Too many columns for a worksheet".to_string()))
}
