use crate::data::data_view::DataView;
use crate::data::events::{ChangeOutcome, StoreEvent, StoreSubscriber};
use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info};

pub const DEFAULT_COL_WIDTH: u16 = 20;
pub const MIN_COL_WIDTH: u16 = 4;
pub const MAX_COL_WIDTH: u16 = 80;

/// Maximum number of store events kept in the history
const MAX_EVENT_HISTORY: usize = 100;

/// Column metadata and definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataColumn {
    /// Identifier, unique within the schema
    pub id: String,
    pub label: String,
    pub visible: bool,
    pub resizable: bool,
    /// Rendering width in terminal cells
    pub width: u16,
}

impl DataColumn {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            visible: true,
            resizable: true,
            width: DEFAULT_COL_WIDTH,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// A single record, keyed by column id. Rows need not carry every column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRow {
    values: HashMap<String, String>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column_id: &str) -> Option<&str> {
        self.values.get(column_id).map(String::as_str)
    }

    /// Replace the value, returning the previous one
    pub fn set(&mut self, column_id: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(column_id.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Column schema plus the ordered row set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    columns: Vec<DataColumn>,
    rows: Vec<DataRow>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_column(&mut self, column: DataColumn) -> GridResult<&mut Self> {
        if self.column_index(&column.id).is_some() {
            return Err(GridError::DuplicateColumn(column.id));
        }
        self.columns.push(column);
        Ok(self)
    }

    pub fn add_row(&mut self, row: DataRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// All columns in schema order, hidden ones included
    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn column(&self, column_id: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn visible_column_count(&self) -> usize {
        self.columns.iter().filter(|c| c.visible).count()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Look up a cell. A column the row doesn't carry (or that doesn't exist
    /// at all) reads as the empty string.
    pub fn get_cell(&self, row: usize, column_id: &str) -> GridResult<&str> {
        let data_row = self.rows.get(row).ok_or(GridError::RowOutOfRange {
            row,
            row_count: self.rows.len(),
        })?;
        Ok(data_row.get(column_id).unwrap_or(""))
    }

    fn column_mut(&mut self, column_id: &str) -> Option<&mut DataColumn> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }
}

/// The Schema & Data Store. Owns the table and notifies subscribers of every
/// applied mutation.
pub struct GridStore {
    table: DataTable,
    subscribers: Vec<Box<dyn StoreSubscriber>>,
    event_history: VecDeque<StoreEvent>,
    min_width: u16,
    max_width: u16,
}

impl GridStore {
    pub fn new(table: DataTable) -> Self {
        Self {
            table,
            subscribers: Vec::new(),
            event_history: VecDeque::with_capacity(MAX_EVENT_HISTORY),
            min_width: MIN_COL_WIDTH,
            max_width: MAX_COL_WIDTH,
        }
    }

    /// Set the range resized widths are clamped to
    pub fn with_width_limits(mut self, min_width: u16, max_width: u16) -> Self {
        self.min_width = min_width.max(1);
        self.max_width = max_width.max(self.min_width);
        self
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    /// Project the current schema onto its visible columns
    pub fn view(&self) -> DataView<'_> {
        DataView::new(&self.table)
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn StoreSubscriber>) {
        info!(target: "store", "Adding store subscriber: {}", subscriber.name());
        self.subscribers.push(subscriber);
    }

    /// Recent events, oldest first
    pub fn event_history(&self) -> impl Iterator<Item = &StoreEvent> {
        self.event_history.iter()
    }

    /// Show or hide a column. Idempotent; never reorders the schema. An
    /// unknown id is reported through the outcome rather than an error.
    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) -> ChangeOutcome {
        let Some(column) = self.table.column_mut(column_id) else {
            debug!(target: "store", "Ignoring visibility change for unknown column '{}'", column_id);
            return ChangeOutcome::UnknownColumn;
        };
        if column.visible == visible {
            return ChangeOutcome::Unchanged;
        }
        column.visible = visible;

        self.notify(StoreEvent::ColumnVisibilityChanged {
            column_id: column_id.to_string(),
            visible,
        });
        ChangeOutcome::Applied
    }

    /// Flip a column's visibility
    pub fn toggle_column_visible(&mut self, column_id: &str) -> ChangeOutcome {
        match self.table.column(column_id).map(|c| c.visible) {
            Some(visible) => self.set_column_visible(column_id, !visible),
            None => ChangeOutcome::UnknownColumn,
        }
    }

    pub fn get_cell(&self, row: usize, column_id: &str) -> GridResult<&str> {
        self.table.get_cell(row, column_id)
    }

    /// Replace a cell value. The column id is validated against the schema
    /// before anything is written.
    pub fn set_cell(&mut self, row: usize, column_id: &str, value: impl Into<String>) -> GridResult<()> {
        if self.table.column(column_id).is_none() {
            return Err(GridError::UnknownColumn(column_id.to_string()));
        }
        let row_count = self.table.rows.len();
        let data_row = self
            .table
            .rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange { row, row_count })?;

        let new_value = value.into();
        let old_value = data_row
            .set(column_id, new_value.clone())
            .unwrap_or_default();

        self.notify(StoreEvent::CellChanged {
            row,
            column_id: column_id.to_string(),
            old_value,
            new_value,
        });
        Ok(())
    }

    /// Change a column's rendering width. Only schema metadata changes; rows
    /// and any focus coordinate are untouched.
    pub fn set_column_width(&mut self, column_id: &str, width: u16) -> ChangeOutcome {
        let width = width.clamp(self.min_width, self.max_width);
        let Some(column) = self.table.column_mut(column_id) else {
            return ChangeOutcome::UnknownColumn;
        };
        if !column.resizable || column.width == width {
            return ChangeOutcome::Unchanged;
        }
        column.width = width;

        self.notify(StoreEvent::ColumnResized {
            column_id: column_id.to_string(),
            width,
        });
        ChangeOutcome::Applied
    }

    fn notify(&mut self, event: StoreEvent) {
        if self.event_history.len() >= MAX_EVENT_HISTORY {
            self.event_history.pop_front();
        }
        self.event_history.push_back(event.clone());

        for subscriber in &mut self.subscribers {
            subscriber.on_store_event(&event, &self.table);
        }
    }
}
