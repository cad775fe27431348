/// Wine dataset loading
///
/// This module handles:
/// - The `WineRecord` row type
/// - Mapping logical columns onto CSV header names
/// - Parsing cleaned CSV exports (including pandas-style float spellings)
/// - Simple column selections used by the research questions
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One wine from a Top 100 list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    pub score: f64,
    pub price: f64,
    pub red: bool,
    pub top100_year: i32,
    pub top100_rank: u32,
}

/// Header names for each logical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub score: String,
    pub price: String,
    pub red: String,
    pub top100_year: String,
    pub top100_rank: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            score: "score".to_string(),
            price: "price".to_string(),
            red: "red".to_string(),
            top100_year: "top100_year".to_string(),
            top100_rank: "top100_rank".to_string(),
        }
    }
}

/// Resolved header positions
struct ColumnIndices {
    score: usize,
    price: usize,
    red: usize,
    top100_year: usize,
    top100_rank: usize,
}

impl ColumnIndices {
    fn resolve(headers: &csv::StringRecord, columns: &ColumnMap) -> Result<Self, String> {
        let find = |name: &str| -> Result<usize, String> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| format!("Column '{}' not found in header ({})", name, headers.iter().collect::<Vec<_>>().join(", ")))
        };

        Ok(Self {
            score: find(&columns.score)?,
            price: find(&columns.price)?,
            red: find(&columns.red)?,
            top100_year: find(&columns.top100_year)?,
            top100_rank: find(&columns.top100_rank)?,
        })
    }
}

/// The full table handed to every research question
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<WineRecord>,
    /// Rows dropped by `skip_invalid`
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn new(records: Vec<WineRecord>) -> Self {
        Self { records, skipped_rows: 0 }
    }

    /// Load a CSV file from disk
    pub fn load(path: &Path, columns: &ColumnMap, skip_invalid: bool) -> Result<Self, String> {
        debug!("Loading dataset from {:?}", path);
        let file = File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
        let dataset = Self::from_reader(file, columns, skip_invalid)?;
        info!("Loaded {} wines from {} ({} rows skipped)", dataset.len(), path.display(), dataset.skipped_rows);
        Ok(dataset)
    }

    /// Parse CSV with a header row from any reader
    pub fn from_reader<R: Read>(reader: R, columns: &ColumnMap, skip_invalid: bool) -> Result<Self, String> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

        let headers = rdr.headers().map_err(|e| format!("Failed to read CSV header: {}", e))?.clone();
        let idx = ColumnIndices::resolve(&headers, columns)?;

        let mut records = Vec::new();
        let mut skipped_rows = 0;

        for (i, row) in rdr.records().enumerate() {
            let row_num = i + 1;
            let parsed = row
                .map_err(|e| format!("Row {}: malformed CSV: {}", row_num, e))
                .and_then(|row| parse_row(&row, &idx, columns).map_err(|e| format!("Row {}: {}", row_num, e)));

            match parsed {
                Ok(record) => records.push(record),
                Err(e) if skip_invalid => {
                    warn!("Skipping invalid row: {}", e);
                    skipped_rows += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self { skipped_rows, ..Self::new(records) })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.price).collect()
    }

    /// Scores of the wines matching `pred`
    pub fn scores_where<F>(&self, pred: F) -> Vec<f64>
    where
        F: Fn(&WineRecord) -> bool,
    {
        self.records.iter().filter(|r| pred(r)).map(|r| r.score).collect()
    }
}

fn cell<'a>(row: &'a csv::StringRecord, i: usize, name: &str) -> Result<&'a str, String> {
    match row.get(i).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing value for '{}'", name)),
    }
}

fn parse_row(row: &csv::StringRecord, idx: &ColumnIndices, columns: &ColumnMap) -> Result<WineRecord, String> {
    let rank = parse_whole(cell(row, idx.top100_rank, &columns.top100_rank)?, &columns.top100_rank)?;
    if rank < 0 {
        return Err(format!("'{}' must be non-negative, got {}", columns.top100_rank, rank));
    }

    Ok(WineRecord {
        score: parse_float(cell(row, idx.score, &columns.score)?, &columns.score)?,
        price: parse_float(cell(row, idx.price, &columns.price)?, &columns.price)?,
        red: parse_flag(cell(row, idx.red, &columns.red)?, &columns.red)?,
        top100_year: parse_whole(cell(row, idx.top100_year, &columns.top100_year)?, &columns.top100_year)? as i32,
        top100_rank: rank as u32,
    })
}

fn parse_float(s: &str, name: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{}' is not a number: '{}'", name, s))?;
    if !v.is_finite() {
        return Err(format!("'{}' is not finite: '{}'", name, s));
    }
    Ok(v)
}

/// Integers, also accepting "2019.0" as written by pandas for float-typed columns
fn parse_whole(s: &str, name: &str) -> Result<i64, String> {
    let v = match s.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            let f = parse_float(s, name)?;
            if f.fract() != 0.0 || f.abs() > i32::MAX as f64 {
                return Err(format!("'{}' is not a whole number: '{}'", name, s));
            }
            f as i64
        }
    };
    if v.abs() > i32::MAX as i64 {
        return Err(format!("'{}' is out of range: '{}'", name, s));
    }
    Ok(v)
}

fn parse_flag(s: &str, name: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        _ => Err(format!("'{}' is not a boolean flag: '{}'", name, s)),
    }
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod dataset_test;
