//! Excel import/export for race result tables
//!
//! - Import: Excel (.xlsx) → header + normalized rows
//! - Export: rows under a column schema → Excel (.xlsx)

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::{
    check_file_name, format_clock, format_date_time, normalize_cell, normalize_float,
    ExcelImporter, ImportedSheet,
};
