use crate::ui::actions::CellCoord;
use crate::ui::focus_controller::FocusTarget;
use tracing::trace;

/// Terminal-side focus target: remembers which cell the cursor belongs on
/// and keeps that cell scrolled into view, both vertically and horizontally
#[derive(Debug, Clone)]
pub struct FocusRing {
    target: Option<CellCoord>,
    row_offset: usize,
    col_offset: usize,
    viewport_rows: usize,
    // Widths of the visible columns and the cells available for them,
    // as of the last frame
    column_widths: Vec<u16>,
    viewport_width: u16,
}

impl Default for FocusRing {
    fn default() -> Self {
        Self {
            target: None,
            row_offset: 0,
            col_offset: 0,
            viewport_rows: 1,
            column_widths: Vec::new(),
            viewport_width: u16::MAX,
        }
    }
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell that currently owns the terminal cursor
    pub fn target(&self) -> Option<CellCoord> {
        self.target
    }

    /// First row drawn in the table body
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    /// First visible column drawn at the left edge
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Called by the renderer once it knows how many rows fit
    pub fn set_viewport_rows(&mut self, rows: usize, row_count: usize) {
        self.viewport_rows = rows.max(1);
        let max_offset = row_count.saturating_sub(self.viewport_rows);
        self.row_offset = self.row_offset.min(max_offset);
        if let Some(coord) = self.target {
            self.scroll_row_into_view(coord.row);
        }
    }

    /// Called by the renderer with the widths of the visible columns and the
    /// cells they share. Each column is followed by a one cell separator.
    pub fn set_viewport_columns(&mut self, widths: &[u16], available: u16) {
        self.column_widths = widths.to_vec();
        self.viewport_width = available;
        self.col_offset = self.col_offset.min(widths.len().saturating_sub(1));
        if let Some(coord) = self.target {
            self.scroll_column_into_view(coord.col);
        }
    }

    fn scroll_row_into_view(&mut self, row: usize) {
        if row < self.row_offset {
            self.row_offset = row;
        } else if row >= self.row_offset + self.viewport_rows {
            self.row_offset = row + 1 - self.viewport_rows;
        }
    }

    fn scroll_column_into_view(&mut self, col: usize) {
        if col >= self.column_widths.len() {
            return;
        }
        if col < self.col_offset {
            self.col_offset = col;
            return;
        }
        // Advance until the span from the offset through `col` fits. A column
        // wider than the viewport ends up alone at the left edge, clipped.
        while self.col_offset < col && !self.span_fits(self.col_offset, col) {
            self.col_offset += 1;
        }
    }

    fn span_fits(&self, first: usize, last: usize) -> bool {
        let needed: u32 = self.column_widths[first..=last]
            .iter()
            .map(|w| u32::from(*w) + 1)
            .sum();
        // The last separator may fall off the edge
        needed.saturating_sub(1) <= u32::from(self.viewport_width)
    }
}

impl FocusTarget for FocusRing {
    fn focus_cell(&mut self, coord: CellCoord) {
        trace!(target: "navigation", "Focus ring -> {:?}", coord);
        self.target = Some(coord);
        self.scroll_row_into_view(coord.row);
        self.scroll_column_into_view(coord.col);
    }

    fn release_focus(&mut self) {
        self.target = None;
    }
}
