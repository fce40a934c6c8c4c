use crate::data::datatable::{DataColumn, DataTable};
use crate::error::{GridError, GridResult};

/// A projection of a DataTable onto its visible columns.
///
/// The view borrows the table and computes the visible-column index space
/// when it is built, so it can never outlive a visibility change. Build a
/// fresh one for every input event and render pass.
#[derive(Clone)]
pub struct DataView<'a> {
    source: &'a DataTable,

    /// Schema indices of the visible columns, in schema order
    visible_columns: Vec<usize>,
}

impl<'a> DataView<'a> {
    pub fn new(source: &'a DataTable) -> Self {
        let visible_columns = source
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.visible)
            .map(|(idx, _)| idx)
            .collect();

        Self {
            source,
            visible_columns,
        }
    }

    pub fn source(&self) -> &'a DataTable {
        self.source
    }

    pub fn row_count(&self) -> usize {
        self.source.row_count()
    }

    /// Number of visible columns
    pub fn column_count(&self) -> usize {
        self.visible_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0 || self.column_count() == 0
    }

    /// Largest valid (row, visible column) pair, or None when there is no
    /// cell to focus at all
    pub fn max_coord(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        Some((self.row_count() - 1, self.column_count() - 1))
    }

    /// Visible columns in schema order
    pub fn visible_columns(&self) -> Vec<&'a DataColumn> {
        let columns = self.source.columns();
        self.visible_columns
            .iter()
            .filter_map(|&idx| columns.get(idx))
            .collect()
    }

    /// Ids of the visible columns
    pub fn column_ids(&self) -> Vec<&'a str> {
        self.visible_columns()
            .into_iter()
            .map(|c| c.id.as_str())
            .collect()
    }

    pub fn column_at(&self, visible_col: usize) -> GridResult<&'a DataColumn> {
        self.visible_columns
            .get(visible_col)
            .and_then(|&idx| self.source.columns().get(idx))
            .ok_or(GridError::ColumnOutOfRange {
                col: visible_col,
                column_count: self.visible_columns.len(),
            })
    }

    /// Position of a column within the visible subset
    pub fn visible_index_of(&self, column_id: &str) -> Option<usize> {
        let schema_idx = self.source.column_index(column_id)?;
        self.visible_columns.iter().position(|&idx| idx == schema_idx)
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.visible_index_of(column_id).is_some()
    }

    /// Resolve a visible coordinate to `(column_id, value)`
    pub fn cell_at(&self, row: usize, visible_col: usize) -> GridResult<(&'a str, &'a str)> {
        if row >= self.row_count() {
            return Err(GridError::RowOutOfRange {
                row,
                row_count: self.row_count(),
            });
        }
        let column = self.column_at(visible_col)?;
        let value = self.source.get_cell(row, &column.id)?;
        Ok((column.id.as_str(), value))
    }

    /// Values of one row across the visible columns
    pub fn row_values(&self, row: usize) -> GridResult<Vec<&'a str>> {
        self.visible_columns()
            .into_iter()
            .map(|c| self.source.get_cell(row, &c.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataRow, GridStore};

    fn create_test_table() -> DataTable {
        let mut table = DataTable::new("test");
        for id in ["a", "b", "c"] {
            table.add_column(DataColumn::new(id)).unwrap();
        }
        table.add_row(DataRow::from_pairs([("a", "a0"), ("b", "b0"), ("c", "c0")]));
        table
    }

    #[test]
    fn test_cell_at_maps_visible_index_to_column() {
        let mut store = GridStore::new(create_test_table());
        assert_eq!(store.view().cell_at(0, 1).unwrap(), ("b", "b0"));

        store.set_column_visible("a", false);
        let view = store.view();
        assert_eq!(view.column_ids(), vec!["b", "c"]);
        assert_eq!(view.cell_at(0, 0).unwrap(), ("b", "b0"));
        assert_eq!(view.cell_at(0, 1).unwrap(), ("c", "c0"));
        assert_eq!(view.visible_index_of("a"), None);
        assert_eq!(view.visible_index_of("c"), Some(1));
    }

    #[test]
    fn test_cell_at_out_of_range() {
        let table = create_test_table();
        let view = DataView::new(&table);
        assert_eq!(
            view.cell_at(0, 3),
            Err(GridError::ColumnOutOfRange {
                col: 3,
                column_count: 3
            })
        );
        assert_eq!(
            view.cell_at(1, 0),
            Err(GridError::RowOutOfRange {
                row: 1,
                row_count: 1
            })
        );
    }

    #[test]
    fn test_max_coord_empty() {
        let mut table = DataTable::new("empty");
        table.add_column(DataColumn::new("a")).unwrap();
        assert_eq!(DataView::new(&table).max_coord(), None);
        assert!(DataView::new(&table).is_empty());
    }
}
