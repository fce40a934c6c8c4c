// Action system for grid input
// Raw key and mouse events are mapped to these before anything mutates state

use crossterm::event::KeyEvent;

/// A cell coordinate in the visible index space: row index plus position
/// among the currently visible columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Single-step directional movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateAction {
    Up,
    Down,
    Left,
    Right,
}

/// Input consumed by the focus and edit controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridInput {
    Navigate(NavigateAction),
    /// Pointer click on a rendered cell
    Click(CellCoord),
    /// Enter on the focused cell: opens the edit popup
    Commit,
    /// Enter inside the edit popup
    ConfirmEdit,
    /// Esc inside the edit popup
    CancelEdit,
    /// Any other key while the edit popup is open
    EditKey(KeyEvent),
    /// A key the grid has no meaning for
    Other,
}

/// Which way a resize nudges the focused column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    Narrower,
    Wider,
}

/// All actions the grid application can perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Grid(GridInput),

    /// Focus the first cell when nothing is focused yet
    FocusFirstCell,

    /// Toggle visibility of the schema column at this position
    ToggleColumn(usize),
    ResizeFocusedColumn(ResizeDirection),

    ShowHelp,
    ToggleDebug,
    Quit,
}

impl From<GridInput> for Action {
    fn from(input: GridInput) -> Self {
        Action::Grid(input)
    }
}
