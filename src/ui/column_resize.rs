//! Pointer-driven column resizing
//!
//! Widths update live while the pointer moves. Every update is an absolute
//! width computed from where the drag started, so repeated or out-of-order
//! drag events converge on the same width.

use crate::data::datatable::GridStore;
use crate::data::events::ChangeOutcome;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
struct DragState {
    column_id: String,
    origin_x: u16,
    origin_width: u16,
}

#[derive(Debug, Default)]
pub struct ColumnResizer {
    drag: Option<DragState>,
}

impl ColumnResizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Column under the active drag, if any
    pub fn dragging_column(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.column_id.as_str())
    }

    /// Start dragging a column's grip. Returns false for unknown or fixed
    /// width columns.
    pub fn begin(&mut self, store: &GridStore, column_id: &str, x: u16) -> bool {
        let Some(column) = store.table().column(column_id) else {
            return false;
        };
        if !column.resizable {
            return false;
        }
        debug!(target: "grid", "Begin resize of '{}' at x={}", column_id, x);
        self.drag = Some(DragState {
            column_id: column_id.to_string(),
            origin_x: x,
            origin_width: column.width,
        });
        true
    }

    /// Pointer moved to `x` while dragging
    pub fn update(&mut self, store: &mut GridStore, x: u16) -> ChangeOutcome {
        let Some(drag) = &self.drag else {
            return ChangeOutcome::Unchanged;
        };
        let delta = i32::from(x) - i32::from(drag.origin_x);
        let width = (i32::from(drag.origin_width) + delta).clamp(1, i32::from(u16::MAX));
        let width = u16::try_from(width).unwrap_or(u16::MAX);
        store.set_column_width(&drag.column_id, width)
    }

    pub fn end(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!(target: "grid", "End resize of '{}'", drag.column_id);
        }
    }
}

/// Nudge a column's width by a signed step (keyboard resizing)
pub fn nudge_column_width(store: &mut GridStore, column_id: &str, step: i32) -> ChangeOutcome {
    let Some(column) = store.table().column(column_id) else {
        return ChangeOutcome::UnknownColumn;
    };
    let width = (i32::from(column.width) + step).clamp(1, i32::from(u16::MAX));
    store.set_column_width(column_id, u16::try_from(width).unwrap_or(u16::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataTable};

    fn store() -> GridStore {
        let mut table = DataTable::new("t");
        table.add_column(DataColumn::new("a").with_width(10)).unwrap();
        table
            .add_column(DataColumn::new("fixed").with_resizable(false))
            .unwrap();
        GridStore::new(table).with_width_limits(4, 40)
    }

    #[test]
    fn test_drag_updates_are_absolute() {
        let mut store = store();
        let mut resizer = ColumnResizer::new();
        assert!(resizer.begin(&store, "a", 20));

        resizer.update(&mut store, 25);
        assert_eq!(store.table().column("a").unwrap().width, 15);
        // Same pointer position again: same width, no drift
        assert_eq!(resizer.update(&mut store, 25), ChangeOutcome::Unchanged);
        resizer.update(&mut store, 18);
        assert_eq!(store.table().column("a").unwrap().width, 8);

        resizer.end();
        assert!(!resizer.is_dragging());
        assert_eq!(resizer.update(&mut store, 100), ChangeOutcome::Unchanged);
    }

    #[test]
    fn test_drag_clamps_to_limits() {
        let mut store = store();
        let mut resizer = ColumnResizer::new();
        resizer.begin(&store, "a", 20);
        resizer.update(&mut store, 0);
        assert_eq!(store.table().column("a").unwrap().width, 4);
    }

    #[test]
    fn test_fixed_column_cannot_be_dragged() {
        let store = store();
        let mut resizer = ColumnResizer::new();
        assert!(!resizer.begin(&store, "fixed", 3));
        assert!(!resizer.begin(&store, "ghost", 3));
    }

    #[test]
    fn test_nudge() {
        let mut store = store();
        assert_eq!(nudge_column_width(&mut store, "a", 2), ChangeOutcome::Applied);
        assert_eq!(store.table().column("a").unwrap().width, 12);
        assert_eq!(nudge_column_width(&mut store, "ghost", 2), ChangeOutcome::UnknownColumn);
    }
}
