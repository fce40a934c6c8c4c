//! The interactive grid application
//!
//! Owns the store and the focus controller and wires them to the terminal:
//! key and mouse events become actions, actions drive the controller, and
//! every frame is drawn from a fresh projection of the store.

use crate::config::config::Config;
use crate::data::data_provider::DataProvider;
use crate::data::datatable::{DataTable, GridStore};
use crate::data::events::{ChangeOutcome, RedrawSubscriber, TracingSubscriber};
use crate::handlers::navigation::{InputMode, NavigationHandler};
use crate::logging::log_buffer;
use crate::ui::actions::{Action, CellCoord, GridInput, ResizeDirection};
use crate::ui::cell_handles::CellHandleMap;
use crate::ui::column_resize::{nudge_column_width, ColumnResizer};
use crate::ui::focus_controller::{FocusController, Transition};
use crate::ui::focus_ring::FocusRing;
use crate::ui::grid_renderer::{centered_rect, render_grid};
use crate::ui::rendering::GridRenderContextBuilder;
use crate::widgets::debug_widget::DebugWidget;
use crate::widgets::help_widget::{HelpAction, HelpWidget};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

/// Which overlay, if any, is drawn over the grid and receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    Help,
    Debug,
}

pub struct GridApp {
    store: GridStore,
    controller: FocusController,
    ring: FocusRing,
    handles: CellHandleMap,
    resizer: ColumnResizer,
    navigation: NavigationHandler,
    config: Config,

    help_widget: HelpWidget,
    debug_widget: DebugWidget,
    overlay: Overlay,

    status_message: Option<String>,
    /// Set by the store whenever a mutation lands, and by any input that
    /// changes what is on screen
    dirty: Rc<Cell<bool>>,
    should_quit: bool,
}

impl GridApp {
    pub fn new(table: DataTable, config: Config) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let mut store = GridStore::new(table)
            .with_width_limits(config.grid.min_column_width, config.grid.max_column_width);
        store.subscribe(Box::new(TracingSubscriber));
        store.subscribe(Box::new(RedrawSubscriber::new(Rc::clone(&dirty))));

        info!(
            target: "grid",
            "Grid '{}' ready: {} rows, {} columns",
            store.table().name,
            store.row_count(),
            store.table().column_count()
        );

        Self {
            store,
            controller: FocusController::new(),
            ring: FocusRing::new(),
            handles: CellHandleMap::new(),
            resizer: ColumnResizer::new(),
            navigation: NavigationHandler::new(config.keybindings.vim_mode),
            config,
            help_widget: HelpWidget::new(),
            debug_widget: DebugWidget::new(),
            overlay: Overlay::None,
            status_message: None,
            dirty,
            should_quit: false,
        }
    }

    pub fn from_provider(provider: &dyn DataProvider, config: Config) -> Result<Self> {
        Ok(Self::new(provider.load()?, config))
    }

    pub fn store(&self) -> &GridStore {
        &self.store
    }

    pub fn controller(&self) -> &FocusController {
        &self.controller
    }

    pub fn focus_ring(&self) -> &FocusRing {
        &self.ring
    }

    /// Regions recorded by the last render
    pub fn handles(&self) -> &CellHandleMap {
        &self.handles
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_help_visible(&self) -> bool {
        self.overlay == Overlay::Help
    }

    pub fn is_debug_visible(&self) -> bool {
        self.overlay == Overlay::Debug
    }

    /// Replace the edit draft while the popup is open
    pub fn set_edit_draft(&mut self, value: &str) -> bool {
        self.mark_dirty();
        self.controller.set_draft(value)
    }

    /// Returns whether a redraw is due, clearing the flag
    pub fn take_redraw(&self) -> bool {
        self.dirty.replace(false)
    }

    fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            Event::Resize(width, height) => {
                debug!(target: "grid", "Terminal resized to {}x{}", width, height);
                self.mark_dirty();
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.mark_dirty();

        match self.overlay {
            Overlay::Help => {
                if self.help_widget.handle_key(key) == HelpAction::Exit {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::Debug => {
                if self.debug_widget.handle_key(key) {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::None => {}
        }

        let mode = if self.controller.is_editing() {
            InputMode::Editing
        } else {
            InputMode::Grid
        };
        if let Some(action) = self.navigation.handle_key(key, mode) {
            self.apply_action(action);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // The edit popup and overlays are modal
                if self.controller.is_editing() || self.overlay != Overlay::None {
                    return;
                }
                self.mark_dirty();

                if let Some(column_id) = self.handles.resize_grip_at(x, y) {
                    self.resizer.begin(&self.store, column_id, x);
                } else if let Some(column_id) = self.handles.toggle_at(x, y).map(str::to_string) {
                    self.toggle_column(&column_id);
                } else if let Some(coord) = self.handles.cell_at(x, y) {
                    info!(target: "grid", "Clicked cell: row {}, col {}", coord.row, coord.col);
                    self.dispatch(GridInput::Click(coord));
                }
            }
            MouseEventKind::Drag(MouseButton::Left)
                if self.resizer.is_dragging() && !self.controller.is_editing() =>
            {
                self.resizer.update(&mut self.store, x);
            }
            MouseEventKind::Up(MouseButton::Left) if self.resizer.is_dragging() => {
                self.resizer.end();
                self.mark_dirty();
            }
            // Plain pointer motion changes nothing on screen
            _ => {}
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        debug!(target: "grid", "Action: {:?}", action);
        match action {
            Action::Grid(input) => {
                self.dispatch(input);
            }
            Action::FocusFirstCell => {
                if self.controller.focused().is_none() && !self.store.view().is_empty() {
                    self.dispatch(GridInput::Click(CellCoord::new(0, 0)));
                }
            }
            Action::ToggleColumn(position) => {
                let column_id = self
                    .store
                    .table()
                    .columns()
                    .get(position)
                    .map(|c| c.id.clone());
                if let Some(column_id) = column_id {
                    self.toggle_column(&column_id);
                }
            }
            Action::ResizeFocusedColumn(direction) => self.resize_focused_column(direction),
            Action::ShowHelp => self.overlay = Overlay::Help,
            Action::ToggleDebug => {
                if let Some(buffer) = log_buffer() {
                    self.debug_widget.refresh(&buffer);
                } else {
                    self.debug_widget.set_content("Logging is not initialized");
                }
                self.overlay = Overlay::Debug;
            }
            Action::Quit => {
                info!(target: "system", "Quit requested");
                self.should_quit = true;
            }
        }
    }

    /// Feed one input to the controller and report what happened
    fn dispatch(&mut self, input: GridInput) -> Transition {
        let transition = self.controller.handle(input, &mut self.store, &mut self.ring);
        match &transition {
            Transition::Moved { .. } => self.status_message = None,
            Transition::EditStarted(_) => {
                // A grip drag in flight must not keep resizing under the popup
                self.resizer.end();
                self.status_message = None;
            }
            Transition::EditCommitted { row, column_id } => {
                self.status_message = Some(format!("Saved row {} '{}'", row + 1, column_id));
            }
            Transition::EditCancelled => {
                self.status_message = Some("Edit cancelled".to_string());
            }
            Transition::EditDiscarded(e) => {
                self.status_message = Some(format!("Edit discarded: {}", e));
            }
            Transition::Clamped(_) | Transition::DraftChanged | Transition::Ignored => {}
        }
        transition
    }

    /// Show or hide a column, then pull focus back inside the new bounds
    pub fn toggle_column(&mut self, column_id: &str) -> ChangeOutcome {
        let outcome = self.store.toggle_column_visible(column_id);
        if outcome.is_applied() {
            self.controller.revalidate(&self.store.view(), &mut self.ring);
            if let Some(column) = self.store.table().column(column_id) {
                self.status_message = Some(format!(
                    "Column '{}' {}",
                    column.label,
                    if column.visible { "shown" } else { "hidden" }
                ));
            }
        }
        outcome
    }

    fn resize_focused_column(&mut self, direction: ResizeDirection) {
        let Some(coord) = self.controller.focused() else {
            return;
        };
        let column_id = match self.store.view().column_at(coord.col) {
            Ok(column) => column.id.clone(),
            Err(_) => return,
        };
        let step = i32::from(self.config.grid.resize_step);
        let step = match direction {
            ResizeDirection::Narrower => -step,
            ResizeDirection::Wider => step,
        };
        nudge_column_width(&mut self.store, &column_id, step);
    }

    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        {
            let ctx = GridRenderContextBuilder::new(self.store.view())
                .focus(&self.controller)
                .resizing(self.resizer.dragging_column())
                .display_options(
                    &self.config.display.title,
                    self.config.display.show_row_numbers,
                    self.config.display.show_column_toggles,
                )
                .focus_style(self.config.theme.focus_style.to_style())
                .status_message(self.status_message.as_deref())
                .build();
            render_grid(f, area, &ctx, &mut self.ring, &mut self.handles);
        }

        match self.overlay {
            Overlay::Help => self.help_widget.render(f, centered_rect(70, 22, area)),
            Overlay::Debug => self.debug_widget.render(f, area),
            Overlay::None => {}
        }
    }

    /// Event loop: redraw when something changed, then wait for input
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            if self.take_redraw() {
                terminal.draw(|f| self.render(f))?;
            }
            if event::poll(Duration::from_millis(250))? {
                let event = event::read()?;
                self.handle_event(&event);
            }
        }
        Ok(())
    }
}

/// Take over the terminal and run the grid until the user quits
pub fn run_grid_app(table: DataTable, config: Config) -> Result<()> {
    let mut app = GridApp::new(table, config);

    if let Err(e) = enable_raw_mode() {
        return Err(anyhow::anyhow!("Failed to enable raw mode: {}", e));
    }

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(anyhow::anyhow!("Failed to setup terminal: {}", e));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            return Err(anyhow::anyhow!("Failed to create terminal: {}", e));
        }
    };

    let res = app.run(&mut terminal);

    // Always restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    res.map_err(|e| anyhow::anyhow!("Grid error: {}", e))
}
