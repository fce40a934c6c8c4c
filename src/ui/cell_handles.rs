//! Screen handles for everything clickable in the grid
//!
//! Rebuilt from scratch on every render pass, so a handle always describes
//! the projection that was last drawn. Handles live in a flat arena; the
//! coordinate index only stores arena slots.

use crate::ui::actions::CellCoord;
use ratatui::layout::Rect;
use std::collections::HashMap;

/// Opaque reference to a rendered cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct CellSlot {
    coord: CellCoord,
    area: Rect,
}

/// A clickable region tied to a column id (visibility toggles, resize grips)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRegion {
    pub column_id: String,
    pub area: Rect,
}

#[derive(Debug, Default, Clone)]
pub struct CellHandleMap {
    slots: Vec<CellSlot>,
    by_coord: HashMap<CellCoord, CellHandle>,
    toggles: Vec<ColumnRegion>,
    resize_grips: Vec<ColumnRegion>,
}

impl CellHandleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything from the previous render pass
    pub fn clear(&mut self) {
        self.slots.clear();
        self.by_coord.clear();
        self.toggles.clear();
        self.resize_grips.clear();
    }

    pub fn register_cell(&mut self, coord: CellCoord, area: Rect) -> CellHandle {
        let handle = CellHandle(self.slots.len());
        self.slots.push(CellSlot { coord, area });
        self.by_coord.insert(coord, handle);
        handle
    }

    pub fn register_toggle(&mut self, column_id: impl Into<String>, area: Rect) {
        self.toggles.push(ColumnRegion {
            column_id: column_id.into(),
            area,
        });
    }

    pub fn register_resize_grip(&mut self, column_id: impl Into<String>, area: Rect) {
        self.resize_grips.push(ColumnRegion {
            column_id: column_id.into(),
            area,
        });
    }

    pub fn handle(&self, coord: CellCoord) -> Option<CellHandle> {
        self.by_coord.get(&coord).copied()
    }

    pub fn area(&self, handle: CellHandle) -> Option<Rect> {
        self.slots.get(handle.0).map(|slot| slot.area)
    }

    pub fn coord(&self, handle: CellHandle) -> Option<CellCoord> {
        self.slots.get(handle.0).map(|slot| slot.coord)
    }

    /// Screen area of a coordinate, if it was drawn
    pub fn cell_area(&self, coord: CellCoord) -> Option<Rect> {
        self.handle(coord).and_then(|h| self.area(h))
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<CellCoord> {
        self.slots
            .iter()
            .find(|slot| contains(slot.area, x, y))
            .map(|slot| slot.coord)
    }

    pub fn toggle_at(&self, x: u16, y: u16) -> Option<&str> {
        region_at(&self.toggles, x, y)
    }

    pub fn resize_grip_at(&self, x: u16, y: u16) -> Option<&str> {
        region_at(&self.resize_grips, x, y)
    }

    pub fn cell_count(&self) -> usize {
        self.slots.len()
    }
}

fn region_at(regions: &[ColumnRegion], x: u16, y: u16) -> Option<&str> {
    regions
        .iter()
        .find(|r| contains(r.area, x, y))
        .map(|r| r.column_id.as_str())
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}
