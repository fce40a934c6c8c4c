//! Store events and the subscriber hook used to observe them

use crate::data::datatable::DataTable;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info};

/// A mutation that was applied to the grid store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A cell value was replaced (possibly with the same text)
    CellChanged {
        row: usize,
        column_id: String,
        old_value: String,
        new_value: String,
    },

    /// A column was shown or hidden
    ColumnVisibilityChanged { column_id: String, visible: bool },

    /// A column's rendering width changed
    ColumnResized { column_id: String, width: u16 },
}

impl StoreEvent {
    /// Whether this event can change the visible-column index space
    pub fn affects_projection(&self) -> bool {
        matches!(self, StoreEvent::ColumnVisibilityChanged { .. })
    }
}

/// Result of a schema mutation that is allowed to be a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Applied,
    Unchanged,
    UnknownColumn,
}

impl ChangeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ChangeOutcome::Applied)
    }
}

/// Trait for components that observe store mutations
pub trait StoreSubscriber {
    /// Handle a store event. The table already reflects the change.
    fn on_store_event(&mut self, event: &StoreEvent, table: &DataTable);

    /// Subscriber name for debugging
    fn name(&self) -> &str;
}

/// Logs every store event on the `store` target
pub struct TracingSubscriber;

impl StoreSubscriber for TracingSubscriber {
    fn on_store_event(&mut self, event: &StoreEvent, table: &DataTable) {
        if event.affects_projection() {
            info!(
                target: "store",
                "{:?} (visible columns now {})",
                event,
                table.visible_column_count()
            );
        } else {
            debug!(target: "store", "{:?} (rows={})", event, table.row_count());
        }
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

/// Flips a shared flag so the render loop knows the projection is out of date
pub struct RedrawSubscriber {
    dirty: Rc<Cell<bool>>,
}

impl RedrawSubscriber {
    pub fn new(dirty: Rc<Cell<bool>>) -> Self {
        Self { dirty }
    }
}

impl StoreSubscriber for RedrawSubscriber {
    fn on_store_event(&mut self, _event: &StoreEvent, _table: &DataTable) {
        self.dirty.set(true);
    }

    fn name(&self) -> &str {
        "redraw"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_visibility_affects_projection() {
        let hidden = StoreEvent::ColumnVisibilityChanged {
            column_id: "role".to_string(),
            visible: false,
        };
        let resized = StoreEvent::ColumnResized {
            column_id: "role".to_string(),
            width: 30,
        };
        assert!(hidden.affects_projection());
        assert!(!resized.affects_projection());
    }

    #[test]
    fn test_redraw_subscriber_sets_flag() {
        let dirty = Rc::new(Cell::new(false));
        let mut subscriber = RedrawSubscriber::new(dirty.clone());
        let table = DataTable::new("empty");

        subscriber.on_store_event(
            &StoreEvent::ColumnResized {
                column_id: "x".to_string(),
                width: 5,
            },
            &table,
        );
        assert!(dirty.get());
    }
}
