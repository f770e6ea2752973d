use crate::error::RaceResult;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::export::download_filename;
use crate::types::{Row, SchemaVariant, Table};
use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Serialize)]
struct ImportOutput<'a> {
    data: &'a [Row],
}

/// Execute the import command: .xlsx → `{"data": [...]}` JSON
pub fn import(input: PathBuf, output: Option<PathBuf>) -> RaceResult<()> {
    let sheet = ExcelImporter::open(&input)?;
    let json = serde_json::to_string_pretty(&ImportOutput { data: &sheet.rows })?;

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!("{}", "✅ Import Complete!".bold().green());
            println!("   Input:  {}", input.display());
            println!("   Sheet:  {}", sheet.sheet_name.bright_blue());
            println!(
                "   {} columns, {} rows",
                sheet.header.len(),
                sheet.row_count()
            );
            println!("   JSON file: {}\n", path.display());
        }
        // Stdout stays pure JSON so it can be piped
        None => println!("{}", json),
    }

    Ok(())
}

/// Execute the export command: JSON rows → .xlsx
pub fn export(input: PathBuf, output: Option<PathBuf>, schema: SchemaVariant) -> RaceResult<PathBuf> {
    println!("{}", "🏁 Race Scorer - Excel Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Schema: {} ({} columns)", schema, schema.width());

    let content = fs::read_to_string(&input)?;
    let rows: Vec<Row> = serde_json::from_str(&content)?;
    let table = Table::from_schema(schema, rows)?;

    let output = output.unwrap_or_else(|| PathBuf::from(download_filename(Local::now())));
    ExcelExporter::new().write(&table, &output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   {} rows", table.row_count());
    println!("   Excel file: {}\n", output.display());

    Ok(output)
}

/// Execute the schema command: list the column names in order
pub fn schema(schema: SchemaVariant) -> RaceResult<()> {
    println!(
        "{}",
        format!("📋 Schema: {} ({} columns)", schema, schema.width())
            .bold()
            .green()
    );
    for (idx, name) in schema.columns().iter().enumerate() {
        println!("   {:>2}. {}", idx + 1, name);
    }
    Ok(())
}
