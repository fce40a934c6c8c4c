// Grid rendering context that gathers everything one frame needs
// The renderer reads only this, never the app or controller directly

use crate::data::data_view::DataView;
use crate::data::datatable::DataColumn;
use crate::ui::actions::CellCoord;
use crate::ui::focus_controller::FocusController;
use ratatui::style::{Color, Modifier, Style};

/// The open edit popup, as the renderer sees it
#[derive(Debug, Clone)]
pub struct EditOverlay<'a> {
    pub row: usize,
    pub column_label: &'a str,
    pub draft: &'a str,
    /// Cursor position within the draft, in characters
    pub cursor: usize,
}

/// All the data needed to draw the grid for one frame
#[derive(Clone)]
pub struct GridRenderContext<'a> {
    // ========== Data Source ==========
    /// Visible projection of the table
    pub view: DataView<'a>,

    /// Every column in schema order, hidden ones included (toggle bar)
    pub all_columns: &'a [DataColumn],

    // ========== Focus & Editing ==========
    pub focused: Option<CellCoord>,
    pub edit: Option<EditOverlay<'a>>,

    /// Column whose grip is being dragged
    pub resizing_column: Option<&'a str>,

    // ========== Visual Options ==========
    pub title: &'a str,
    pub show_row_numbers: bool,
    pub show_column_toggles: bool,
    pub focus_style: Style,

    /// Message for the status line; a focus summary is shown when None
    pub status_message: Option<&'a str>,
}

impl<'a> GridRenderContext<'a> {
    pub fn is_focused_cell(&self, row: usize, visible_col: usize) -> bool {
        self.focused == Some(CellCoord::new(row, visible_col))
    }

    pub fn is_focused_column(&self, visible_col: usize) -> bool {
        self.focused.is_some_and(|c| c.col == visible_col)
    }

    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Status line text
    pub fn status_line(&self) -> String {
        if let Some(message) = self.status_message {
            return message.to_string();
        }
        if let Some(edit) = &self.edit {
            return format!(
                "-- EDIT -- row {}, '{}'  Enter: save  Esc: cancel",
                edit.row + 1,
                edit.column_label
            );
        }
        match self.focused {
            Some(coord) => match self.view.column_at(coord.col) {
                Ok(column) => format!(
                    "Row {}/{}  Col {}/{}  {} (width {})  F1: help",
                    coord.row + 1,
                    self.view.row_count(),
                    coord.col + 1,
                    self.view.column_count(),
                    column.label,
                    column.width
                ),
                Err(_) => String::new(),
            },
            None => "Click a cell or press Tab to start  F1: help".to_string(),
        }
    }
}

/// Builder for GridRenderContext to make construction easier
pub struct GridRenderContextBuilder<'a> {
    context: GridRenderContext<'a>,
}

impl<'a> GridRenderContextBuilder<'a> {
    pub fn new(view: DataView<'a>) -> Self {
        let all_columns = view.source().columns();
        Self {
            context: GridRenderContext {
                view,
                all_columns,
                focused: None,
                edit: None,
                resizing_column: None,
                title: "",
                show_row_numbers: false,
                show_column_toggles: true,
                focus_style: Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
                status_message: None,
            },
        }
    }

    /// Take focus and the edit popup from the controller
    pub fn focus(mut self, controller: &'a FocusController) -> Self {
        self.context.focused = controller.focused();
        self.context.edit = controller.edit_session().map(|session| {
            let column_label = self
                .context
                .view
                .source()
                .column(&session.column_id)
                .map_or(session.column_id.as_str(), |c| c.label.as_str());
            EditOverlay {
                row: session.coord.row,
                column_label,
                draft: session.draft(),
                cursor: session.draft_cursor(),
            }
        });
        self
    }

    pub fn resizing(mut self, column_id: Option<&'a str>) -> Self {
        self.context.resizing_column = column_id;
        self
    }

    pub fn display_options(
        mut self,
        title: &'a str,
        show_row_numbers: bool,
        show_column_toggles: bool,
    ) -> Self {
        self.context.title = title;
        self.context.show_row_numbers = show_row_numbers;
        self.context.show_column_toggles = show_column_toggles;
        self
    }

    pub fn focus_style(mut self, style: Style) -> Self {
        self.context.focus_style = style;
        self
    }

    pub fn status_message(mut self, message: Option<&'a str>) -> Self {
        self.context.status_message = message;
        self
    }

    pub fn build(self) -> GridRenderContext<'a> {
        self.context
    }
}
