//! Data providers that hand the grid its initial schema and rows
//!
//! The grid only ever sees a `DataTable`. Where it came from (the built-in
//! team roster, a CSV export, a JSON report fetched by the host) is the
//! provider's business.

use crate::data::datatable::{DataColumn, DataRow, DataTable, DEFAULT_COL_WIDTH};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::fmt::Debug;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Source of the initial grid contents
pub trait DataProvider: Debug {
    fn load(&self) -> Result<DataTable>;
}

/// The static team roster shown when no data file is given
#[derive(Debug, Default)]
pub struct DefaultDataProvider;

impl DefaultDataProvider {
    const COLUMNS: [(&'static str, &'static str); 4] = [
        ("name", "Name"),
        ("role", "Role"),
        ("status", "Status"),
        ("email", "Email"),
    ];

    const ROWS: [[&'static str; 4]; 3] = [
        ["Alice Johnson", "Designer", "Active", "alice@gob.io"],
        ["Bob Smith", "Developer", "Inactive", "bob@gob.io"],
        ["Charlie Brown", "Product Manager", "Active", "charlie@gob.io"],
    ];
}

impl DataProvider for DefaultDataProvider {
    fn load(&self) -> Result<DataTable> {
        let mut table = DataTable::new("team");
        for (id, label) in Self::COLUMNS {
            table.add_column(DataColumn::new(id).with_label(label))?;
        }
        for values in Self::ROWS {
            let ids = Self::COLUMNS.iter().map(|(id, _)| *id);
            table.add_row(DataRow::from_pairs(ids.zip(values)));
        }
        Ok(table)
    }
}

/// Loads a CSV file: the header row becomes the schema
#[derive(Debug)]
pub struct CsvDataProvider {
    path: PathBuf,
    column_width: u16,
}

impl CsvDataProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column_width: DEFAULT_COL_WIDTH,
        }
    }

    pub fn with_column_width(mut self, width: u16) -> Self {
        self.column_width = width;
        self
    }
}

impl DataProvider for CsvDataProvider {
    fn load(&self) -> Result<DataTable> {
        info!(target: "store", "Loading CSV from {}", self.path.display());
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

        let headers = reader.headers()?.clone();
        let mut table = DataTable::new(table_name(&self.path));
        for header in headers.iter() {
            table.add_column(DataColumn::new(header).with_width(self.column_width))?;
        }

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > headers.len() {
                debug!(
                    target: "store",
                    "CSV record {} has {} fields, dropping {} past the header",
                    index + 1,
                    record.len(),
                    record.len() - headers.len()
                );
            }
            // Short records just leave their trailing columns empty
            table.add_row(DataRow::from_pairs(headers.iter().zip(record.iter())));
        }

        info!(
            target: "store",
            "CSV load complete: {} rows, {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }
}

/// Loads a JSON array of flat objects
#[derive(Debug)]
pub struct JsonDataProvider {
    path: PathBuf,
    column_width: u16,
}

impl JsonDataProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column_width: DEFAULT_COL_WIDTH,
        }
    }

    pub fn with_column_width(mut self, width: u16) -> Self {
        self.column_width = width;
        self
    }

    /// Build a table from already-parsed JSON. Columns appear in the order
    /// their keys are first seen.
    pub fn table_from_json(name: &str, json: &JsonValue, column_width: u16) -> Result<DataTable> {
        let records = json
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Expected a JSON array of objects"))?;

        let mut table = DataTable::new(name);
        for (idx, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or_else(|| anyhow::anyhow!("Record {} is not a JSON object", idx))?;

            let mut row = DataRow::new();
            for (key, value) in object {
                if table.column(key).is_none() {
                    table.add_column(DataColumn::new(key.as_str()).with_width(column_width))?;
                }
                match value {
                    JsonValue::Null => {}
                    JsonValue::String(s) => {
                        row.set(key.as_str(), s.as_str());
                    }
                    other => {
                        row.set(key.as_str(), other.to_string());
                    }
                }
            }
            table.add_row(row);
        }
        Ok(table)
    }
}

impl DataProvider for JsonDataProvider {
    fn load(&self) -> Result<DataTable> {
        info!(target: "store", "Loading JSON from {}", self.path.display());
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let json: JsonValue = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))?;
        Self::table_from_json(&table_name(&self.path), &json, self.column_width)
    }
}

/// Pick a provider from a file extension
pub fn provider_for_path(path: &Path, column_width: u16) -> Result<Box<dyn DataProvider>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => Ok(Box::new(
            CsvDataProvider::new(path).with_column_width(column_width),
        )),
        Some("json") => Ok(Box::new(
            JsonDataProvider::new(path).with_column_width(column_width),
        )),
        _ => Err(anyhow::anyhow!(
            "Unsupported data file '{}': expected .csv or .json",
            path.display()
        )),
    }
}

fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("data")
        .to_string()
}
