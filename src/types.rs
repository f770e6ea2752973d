use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RaceError, RaceResult};

//==============================================================================
// Cell values
//==============================================================================

/// A single spreadsheet cell as it travels through JSON.
///
/// Serializes untagged: `null`, an integer, a float, or a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

/// Booleans are carried as `True` / `False` text
impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Text(if b { "True" } else { "False" }.to_string())
    }
}

// Any JSON scalar is accepted. Booleans become text, unsigned numbers past
// i64::MAX become floats.
impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CellVisitor;

        impl<'de> Visitor<'de> for CellVisitor {
            type Value = CellValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number, boolean or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<CellValue, E> {
                Ok(CellValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<CellValue, E> {
                Ok(CellValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<CellValue, E> {
                Ok(CellValue::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<CellValue, E> {
                Ok(CellValue::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<CellValue, E> {
                Ok(i64::try_from(v)
                    .map(CellValue::Int)
                    .unwrap_or(CellValue::Float(v as f64)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<CellValue, E> {
                Ok(CellValue::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<CellValue, E> {
                Ok(CellValue::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<CellValue, E> {
                Ok(CellValue::Text(v))
            }
        }

        deserializer.deserialize_any(CellVisitor)
    }
}

/// One spreadsheet row
pub type Row = Vec<CellValue>;

//==============================================================================
// Column schemas
//==============================================================================

const BASIC_COLUMNS: [&str; 7] = [
    "Participation Team",
    "Lap 1 Time",
    "Lap 2 Time",
    "Lap 3 Time",
    "Total Time",
    "Point Deduction",
    "Total Points",
];

const EXTENDED_COLUMNS: [&str; 12] = [
    "Participation Team",
    "Lap 1 Time",
    "Lap 1 Fouls",
    "Lap 2 Time",
    "Lap 2 Fouls",
    "Lap 3 Time",
    "Lap 3 Fouls",
    "Total Time",
    "Total Fouls",
    "Foul Penalty",
    "Point Deduction",
    "Total Points",
];

/// Column layout expected by export requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Team, three lap times, total time, deduction, points
    #[default]
    Basic,
    /// Basic layout plus per-lap fouls and a foul penalty
    Extended,
}

impl SchemaVariant {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            SchemaVariant::Basic => &BASIC_COLUMNS,
            SchemaVariant::Extended => &EXTENDED_COLUMNS,
        }
    }

    pub fn width(&self) -> usize {
        self.columns().len()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::Basic => "basic",
            SchemaVariant::Extended => "extended",
        }
    }

    /// Fixed single-row dataset served by `GET /download`
    pub fn sample_rows(&self) -> Vec<Row> {
        let row: Row = match self {
            SchemaVariant::Basic => vec![
                "Team A".into(),
                "1:23.45".into(),
                "1:22.10".into(),
                "1:21.98".into(),
                "4:07.53".into(),
                0i64.into(),
                100i64.into(),
            ],
            SchemaVariant::Extended => vec![
                "Team A".into(),
                "1:23.45".into(),
                0i64.into(),
                "1:22.10".into(),
                0i64.into(),
                "1:21.98".into(),
                0i64.into(),
                "4:07.53".into(),
                0i64.into(),
                0i64.into(),
                0i64.into(),
                100i64.into(),
            ],
        };
        vec![row]
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "7" => Ok(SchemaVariant::Basic),
            "extended" | "12" => Ok(SchemaVariant::Extended),
            other => Err(format!(
                "unknown schema '{}', expected 'basic' or 'extended'",
                other
            )),
        }
    }
}

//==============================================================================
// Table
//==============================================================================

/// Ordered rows under a fixed, ordered set of column names.
///
/// Every row is exactly as wide as the column list.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> RaceResult<Self> {
        let expected = columns.len();
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != expected)
        {
            return Err(RaceError::RowWidth {
                row: idx + 1,
                expected,
                found: row.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    /// Build an export table using the column names of `schema`
    pub fn from_schema(schema: SchemaVariant, rows: Vec<Row>) -> RaceResult<Self> {
        let columns = schema.columns().iter().map(|c| c.to_string()).collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
