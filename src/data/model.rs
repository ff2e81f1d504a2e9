use std::collections::{BTreeMap, HashSet};
use std::fmt;

use log::warn;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Normalized column names
// ---------------------------------------------------------------------------

pub const CROP_COLUMN: &str = "crop";
pub const CARBON_FOOTPRINT_COLUMN: &str = "carbon_footprint";
pub const NECESSARY_MEASURES_COLUMN: &str = "necessary_measures";

/// Lower-case and trim a raw header.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Text that is not a number yields `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Text view of the cell; `None` for nulls.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – generic normalized table produced by every reader
// ---------------------------------------------------------------------------

/// A loaded table with normalized column names. Cell values are untouched.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names in file order, lower-cased and trimmed.
    pub column_names: Vec<String>,
    /// Rows keyed by normalized column name.
    pub rows: Vec<BTreeMap<String, CellValue>>,
}

impl Table {
    /// Build a table from raw headers, normalizing them on the way in.
    pub fn new(raw_columns: &[String], raw_rows: Vec<Vec<CellValue>>) -> Self {
        let column_names: Vec<String> = raw_columns
            .iter()
            .map(|c| normalize_column_name(c))
            .collect();
        let rows = raw_rows
            .into_iter()
            .map(|cells| {
                column_names
                    .iter()
                    .cloned()
                    .zip(cells)
                    .collect::<BTreeMap<_, _>>()
            })
            .collect();
        Table { column_names, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Yield dataset
// ---------------------------------------------------------------------------

/// One row of the yield dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldRecord {
    pub crop: String,
    /// `None` when the cell is null or not numeric. May be infinite.
    pub carbon_footprint: Option<f64>,
    /// Every other column of the row, as loaded.
    pub attributes: BTreeMap<String, CellValue>,
}

/// The typed yield dataset.
#[derive(Debug, Clone, Default)]
pub struct YieldTable {
    pub records: Vec<YieldRecord>,
    /// Whether the file's schema carries a `carbon_footprint` column.
    pub has_carbon_footprint: bool,
}

impl YieldTable {
    /// Type a normalized table. Requires a `crop` column.
    pub fn from_table(table: Table) -> anyhow::Result<Self> {
        if !table.has_column(CROP_COLUMN) {
            anyhow::bail!("yield dataset missing '{CROP_COLUMN}' column");
        }
        let has_carbon_footprint = table.has_column(CARBON_FOOTPRINT_COLUMN);

        let mut records = Vec::with_capacity(table.len());
        for (row_no, mut row) in table.rows.into_iter().enumerate() {
            let crop = match row.remove(CROP_COLUMN).and_then(|v| v.as_text()) {
                Some(crop) => crop,
                None => {
                    warn!("yield row {row_no}: null crop, skipping");
                    continue;
                }
            };
            let carbon_footprint = match row.remove(CARBON_FOOTPRINT_COLUMN) {
                None | Some(CellValue::Null) => None,
                Some(cell) => {
                    let value = cell.as_f64();
                    if value.is_none() {
                        warn!("yield row {row_no}: non-numeric carbon_footprint '{cell}'");
                    }
                    value
                }
            };
            records.push(YieldRecord {
                crop,
                carbon_footprint,
                attributes: row,
            });
        }

        Ok(YieldTable {
            records,
            has_carbon_footprint,
        })
    }

    /// Unique crop identifiers in first-seen order.
    pub fn crops(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.crop.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Measures dataset
// ---------------------------------------------------------------------------

/// One row of the measures dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureRecord {
    pub crop: String,
    pub necessary_measures: String,
}

/// The typed measures dataset.
#[derive(Debug, Clone, Default)]
pub struct MeasuresTable {
    pub records: Vec<MeasureRecord>,
}

impl MeasuresTable {
    /// Type a normalized table. Requires `crop` and `necessary_measures`.
    pub fn from_table(table: Table) -> anyhow::Result<Self> {
        for required in [CROP_COLUMN, NECESSARY_MEASURES_COLUMN] {
            if !table.has_column(required) {
                anyhow::bail!("measures dataset missing '{required}' column");
            }
        }

        let mut records = Vec::with_capacity(table.len());
        for (row_no, row) in table.rows.iter().enumerate() {
            let crop = row.get(CROP_COLUMN).and_then(CellValue::as_text);
            let measure = row.get(NECESSARY_MEASURES_COLUMN).and_then(CellValue::as_text);
            match (crop, measure) {
                (Some(crop), Some(necessary_measures)) => records.push(MeasureRecord {
                    crop,
                    necessary_measures,
                }),
                _ => warn!("measures row {row_no}: null crop or measure, skipping"),
            }
        }

        Ok(MeasuresTable { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
