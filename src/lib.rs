//! Race Scorer - race results in and out of Excel
//!
//! A small web utility: upload an .xlsx of race results, edit the rows in
//! the browser, download them again as a timestamped workbook.
//!
//! # Features
//!
//! - Import: first worksheet → JSON-safe rows (string, integer, float, null)
//! - Export: rows under a fixed column schema → .xlsx, no index column
//! - Per-request temp files removed once the download is sent
//! - Basic (7 column) and extended (12 column) schemas
//!
//! # Example
//!
//! ```no_run
//! use race_scorer::excel::{ExcelExporter, ExcelImporter};
//! use race_scorer::types::{SchemaVariant, Table};
//! use std::path::Path;
//!
//! let sheet = ExcelImporter::open(Path::new("results.xlsx"))?;
//! println!("Rows: {}", sheet.row_count());
//!
//! let table = Table::from_schema(SchemaVariant::Basic, sheet.rows)?;
//! ExcelExporter::new().write(&table, Path::new("edited.xlsx"))?;
//! # Ok::<(), race_scorer::error::RaceError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod export;
pub mod types;

// Re-export commonly used types
pub use error::{RaceError, RaceResult};
pub use types::{CellValue, Row, SchemaVariant, Table};
