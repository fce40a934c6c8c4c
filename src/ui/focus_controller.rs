//! Focus and edit controller
//!
//! Owns the single focused-cell coordinate and drives it from `GridInput`.
//! The controller has three states:
//!
//! - `Unfocused`: every directional and commit input is ignored
//! - `Focused(coord)`: arrows move the coordinate, clamped to the grid
//! - `Editing(session)`: modal edit popup; only confirm, cancel and draft
//!   keystrokes are accepted
//!
//! Editing always returns to `Focused` on confirm or cancel. The column being
//! edited is captured by id when the popup opens, and a confirm only writes
//! if that column is still visible, so a column hidden mid-edit can never
//! receive a value meant for its neighbour.

use crate::data::data_view::DataView;
use crate::data::datatable::GridStore;
use crate::error::GridError;
use crate::ui::actions::{CellCoord, GridInput, NavigateAction};
use crossterm::event::Event;
use tracing::{debug, info, warn};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Receives the focus coordinate after every committed change, so the host
/// can move its own input-capture target (cursor, focus ring) to match
pub trait FocusTarget {
    fn focus_cell(&mut self, coord: CellCoord);

    /// Nothing is focused any more
    fn release_focus(&mut self) {}
}

/// An open edit popup
#[derive(Debug, Clone)]
pub struct EditSession {
    pub coord: CellCoord,
    /// Column the edit was opened on, resolved when the popup opened
    pub column_id: String,
    draft: Input,
}

impl EditSession {
    fn new(coord: CellCoord, column_id: String) -> Self {
        Self {
            coord,
            column_id,
            draft: Input::default(),
        }
    }

    pub fn draft(&self) -> &str {
        self.draft.value()
    }

    /// Cursor position within the draft, in characters
    pub fn draft_cursor(&self) -> usize {
        self.draft.visual_cursor()
    }
}

#[derive(Debug, Clone, Default)]
pub enum FocusState {
    #[default]
    Unfocused,
    Focused(CellCoord),
    Editing(EditSession),
}

/// What a single input did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Input had no meaning in the current state
    Ignored,
    /// Focus moved (or was set by a click)
    Moved {
        from: Option<CellCoord>,
        to: CellCoord,
    },
    /// Directional input at the edge of the grid; focus stays put
    Clamped(CellCoord),
    EditStarted(CellCoord),
    DraftChanged,
    EditCommitted { row: usize, column_id: String },
    EditCancelled,
    /// The edit could not be written safely and was dropped
    EditDiscarded(GridError),
}

#[derive(Debug, Default)]
pub struct FocusController {
    state: FocusState,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    /// The focused coordinate, including while the edit popup is open
    pub fn focused(&self) -> Option<CellCoord> {
        match &self.state {
            FocusState::Unfocused => None,
            FocusState::Focused(coord) => Some(*coord),
            FocusState::Editing(session) => Some(session.coord),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, FocusState::Editing(_))
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        match &self.state {
            FocusState::Editing(session) => Some(session),
            _ => None,
        }
    }

    /// Replace the whole draft, for hosts that collect the text themselves
    pub fn set_draft(&mut self, value: &str) -> bool {
        match &mut self.state {
            FocusState::Editing(session) => {
                session.draft = Input::new(value.to_string());
                true
            }
            _ => false,
        }
    }

    /// Process one input. Inputs must be fed in the order they arrived; each
    /// transition starts from the coordinate the previous one left behind.
    pub fn handle(
        &mut self,
        input: GridInput,
        store: &mut GridStore,
        target: &mut dyn FocusTarget,
    ) -> Transition {
        self.revalidate(&store.view(), target);

        match input {
            GridInput::Click(coord) => self.click(coord, &store.view(), target),
            GridInput::Navigate(direction) => self.navigate(direction, &store.view(), target),
            GridInput::Commit => self.begin_edit(&store.view()),
            GridInput::ConfirmEdit => self.confirm_edit(store, target),
            GridInput::CancelEdit => self.cancel_edit(),
            GridInput::EditKey(key) => self.edit_key(key),
            GridInput::Other => Transition::Ignored,
        }
    }

    /// Bring the coordinate back inside the current bounds after rows or
    /// visible columns changed. Clears focus when no cell is left.
    pub fn revalidate(&mut self, view: &DataView, target: &mut dyn FocusTarget) {
        let Some(max) = view.max_coord() else {
            if let FocusState::Focused(coord) = self.state {
                debug!(target: "navigation", "Grid empty, dropping focus at {:?}", coord);
                self.state = FocusState::Unfocused;
                target.release_focus();
            }
            return;
        };

        match &mut self.state {
            FocusState::Unfocused => {}
            FocusState::Focused(coord) => {
                let clamped = clamp_coord(*coord, max);
                if clamped != *coord {
                    debug!(target: "navigation", "Clamping focus {:?} -> {:?}", coord, clamped);
                    *coord = clamped;
                    target.focus_cell(clamped);
                }
            }
            // The edit keeps its captured row and column id; confirm decides
            // whether it can still be written
            FocusState::Editing(session) => {
                session.coord.col = session.coord.col.min(max.1);
            }
        }
    }

    fn click(&mut self, coord: CellCoord, view: &DataView, target: &mut dyn FocusTarget) -> Transition {
        if self.is_editing() {
            return Transition::Ignored;
        }
        let Some(max) = view.max_coord() else {
            return Transition::Ignored;
        };
        if coord.row > max.0 || coord.col > max.1 {
            warn!(target: "navigation", "Click outside grid bounds at {:?}", coord);
            return Transition::Ignored;
        }

        let from = self.focused();
        self.set_focus(coord, target);
        Transition::Moved { from, to: coord }
    }

    fn navigate(
        &mut self,
        direction: NavigateAction,
        view: &DataView,
        target: &mut dyn FocusTarget,
    ) -> Transition {
        let FocusState::Focused(current) = self.state else {
            return Transition::Ignored;
        };
        // Clamping against an empty grid would invent a coordinate
        let Some((max_row, max_col)) = view.max_coord() else {
            return Transition::Ignored;
        };

        let next = match direction {
            NavigateAction::Down => CellCoord::new((current.row + 1).min(max_row), current.col),
            NavigateAction::Up => CellCoord::new(current.row.saturating_sub(1), current.col),
            NavigateAction::Right => CellCoord::new(current.row, (current.col + 1).min(max_col)),
            NavigateAction::Left => CellCoord::new(current.row, current.col.saturating_sub(1)),
        };

        if next == current {
            return Transition::Clamped(current);
        }
        self.set_focus(next, target);
        Transition::Moved {
            from: Some(current),
            to: next,
        }
    }

    fn begin_edit(&mut self, view: &DataView) -> Transition {
        let FocusState::Focused(coord) = self.state else {
            return Transition::Ignored;
        };
        match view.cell_at(coord.row, coord.col) {
            Ok((column_id, _)) => {
                debug!(target: "grid", "Opening edit at {:?} on column '{}'", coord, column_id);
                self.state = FocusState::Editing(EditSession::new(coord, column_id.to_string()));
                Transition::EditStarted(coord)
            }
            Err(e) => {
                warn!(target: "grid", "Cannot edit {:?}: {}", coord, e);
                Transition::Ignored
            }
        }
    }

    fn confirm_edit(&mut self, store: &mut GridStore, target: &mut dyn FocusTarget) -> Transition {
        if !self.is_editing() {
            return Transition::Ignored;
        }
        let FocusState::Editing(session) = std::mem::take(&mut self.state) else {
            return Transition::Ignored;
        };
        let EditSession {
            coord,
            column_id,
            draft,
        } = session;
        self.state = FocusState::Focused(coord);

        let result = write_edit(store, coord.row, &column_id, draft.value());
        // The store may have changed shape while the popup was open
        self.revalidate(&store.view(), target);

        match result {
            Ok(()) => {
                info!(target: "grid", "Edited row {} column '{}'", coord.row, column_id);
                Transition::EditCommitted {
                    row: coord.row,
                    column_id,
                }
            }
            Err(e) => {
                warn!(target: "grid", "Discarding edit at row {}: {}", coord.row, e);
                Transition::EditDiscarded(e)
            }
        }
    }

    fn cancel_edit(&mut self) -> Transition {
        let FocusState::Editing(session) = &self.state else {
            return Transition::Ignored;
        };
        let coord = session.coord;
        debug!(target: "grid", "Edit cancelled at {:?}", coord);
        self.state = FocusState::Focused(coord);
        Transition::EditCancelled
    }

    fn edit_key(&mut self, key: crossterm::event::KeyEvent) -> Transition {
        let FocusState::Editing(session) = &mut self.state else {
            return Transition::Ignored;
        };
        match session.draft.handle_event(&Event::Key(key)) {
            Some(_) => Transition::DraftChanged,
            None => Transition::Ignored,
        }
    }

    /// Commit the coordinate first, then tell the host
    fn set_focus(&mut self, coord: CellCoord, target: &mut dyn FocusTarget) {
        self.state = FocusState::Focused(coord);
        target.focus_cell(coord);
    }
}

/// Write an edit only if its column is still part of the visible projection
fn write_edit(store: &mut GridStore, row: usize, column_id: &str, value: &str) -> Result<(), GridError> {
    {
        let view = store.view();
        if !view.is_column_visible(column_id) {
            return Err(GridError::UnknownColumn(column_id.to_string()));
        }
        if row >= view.row_count() {
            return Err(GridError::RowOutOfRange {
                row,
                row_count: view.row_count(),
            });
        }
    }
    store.set_cell(row, column_id, value)
}

fn clamp_coord(coord: CellCoord, (max_row, max_col): (usize, usize)) -> CellCoord {
    CellCoord::new(coord.row.min(max_row), coord.col.min(max_col))
}
