// Grid rendering that depends only on GridRenderContext
// Every cell is drawn into its own rect so the same rects can be registered
// for hit testing

use crate::ui::actions::CellCoord;
use crate::ui::cell_handles::CellHandleMap;
use crate::ui::focus_ring::FocusRing;
use crate::ui::rendering::GridRenderContext;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Width of the row number gutter, separator included
const GUTTER_WIDTH: u16 = 6;

/// Gap between toggle checkboxes
const TOGGLE_SPACING: u16 = 2;

/// Where one visible column landed on screen
#[derive(Debug, Clone)]
struct ColumnSlot<'a> {
    visible_index: usize,
    id: &'a str,
    label: &'a str,
    x: u16,
    width: u16,
    resizable: bool,
}

/// Draw the grid and record every clickable region in `handles`.
///
/// `ring` is told how many body rows fit, so the focused row can be kept on
/// screen, and the terminal cursor is placed on the focused cell or, while
/// editing, inside the popup.
pub fn render_grid(
    f: &mut Frame,
    area: Rect,
    ctx: &GridRenderContext,
    ring: &mut FocusRing,
    handles: &mut CellHandleMap,
) {
    handles.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let (main, status) = (chunks[0], chunks[1]);

    let block = Block::default().borders(Borders::ALL).title(format!(
        "{} ({} rows, {}/{} columns)",
        ctx.title,
        ctx.view.row_count(),
        ctx.view.column_count(),
        ctx.all_columns.len()
    ));
    let inner = block.inner(main);
    f.render_widget(block, main);

    let mut constraints = Vec::new();
    if ctx.show_column_toggles {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let (header_area, body_area) = if ctx.show_column_toggles {
        render_toggle_bar(f, sections[0], ctx, handles);
        (sections[1], sections[2])
    } else {
        (sections[0], sections[1])
    };

    let columns_x = if ctx.show_row_numbers {
        inner.x.saturating_add(GUTTER_WIDTH)
    } else {
        inner.x
    };
    let widths: Vec<u16> = ctx.view.visible_columns().iter().map(|c| c.width).collect();
    ring.set_viewport_columns(&widths, inner.right().saturating_sub(columns_x));

    let slots = layout_columns(ctx, columns_x, inner.right(), ring.col_offset());
    render_header(f, header_area, ctx, &slots, handles);

    ring.set_viewport_rows(body_area.height as usize, ctx.view.row_count());
    render_body(f, body_area, ctx, &slots, ring.row_offset(), handles);

    f.render_widget(
        Paragraph::new(ctx.status_line()).style(Style::default().fg(Color::DarkGray)),
        status,
    );

    if ctx.is_editing() {
        render_edit_popup(f, area, ctx);
    } else if let Some(rect) = ctx.focused.and_then(|coord| handles.cell_area(coord)) {
        f.set_cursor_position((rect.x, rect.y));
    }
}

/// Place visible columns left to right starting at `col_offset`, clipping
/// at the right edge
fn layout_columns<'a>(
    ctx: &GridRenderContext<'a>,
    left: u16,
    right: u16,
    col_offset: usize,
) -> Vec<ColumnSlot<'a>> {
    let mut x = left;
    let mut slots = Vec::new();
    for (visible_index, column) in ctx
        .view
        .visible_columns()
        .into_iter()
        .enumerate()
        .skip(col_offset)
    {
        if x >= right {
            break;
        }
        let width = column.width.min(right - x);
        slots.push(ColumnSlot {
            visible_index,
            id: column.id.as_str(),
            label: column.label.as_str(),
            x,
            width,
            resizable: column.resizable,
        });
        // One cell of separator, which doubles as the resize grip
        x = x.saturating_add(width).saturating_add(1);
    }
    slots
}

/// Checkbox per schema column, hidden ones included
fn render_toggle_bar(f: &mut Frame, area: Rect, ctx: &GridRenderContext, handles: &mut CellHandleMap) {
    let mut x = area.x;
    for (position, column) in ctx.all_columns.iter().enumerate() {
        if x >= area.right() {
            break;
        }
        let hotkey = if position < 9 {
            format!("{}:", position + 1)
        } else {
            String::new()
        };
        let text = format!(
            "{}[{}] {}",
            hotkey,
            if column.visible { 'x' } else { ' ' },
            column.label
        );
        let text_width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let rect = Rect::new(x, area.y, text_width.min(area.right() - x), 1);

        let style = if column.visible {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(Paragraph::new(text).style(style), rect);
        handles.register_toggle(column.id.as_str(), rect);

        x = x.saturating_add(text_width).saturating_add(TOGGLE_SPACING);
    }
}

/// Column labels with a grip after each resizable column
fn render_header(
    f: &mut Frame,
    area: Rect,
    ctx: &GridRenderContext,
    slots: &[ColumnSlot],
    handles: &mut CellHandleMap,
) {
    if ctx.show_row_numbers {
        f.render_widget(
            Paragraph::new("#").style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Rect::new(area.x, area.y, GUTTER_WIDTH.min(area.width), 1),
        );
    }

    for slot in slots {
        let mut style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        if ctx.is_focused_column(slot.visible_index) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);
        }
        f.render_widget(
            Paragraph::new(slot.label).style(style),
            Rect::new(slot.x, area.y, slot.width, 1),
        );

        let grip_x = slot.x.saturating_add(slot.width);
        if slot.resizable && grip_x < area.right() {
            let grip_style = if ctx.resizing_column == Some(slot.id) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let grip = Rect::new(grip_x, area.y, 1, 1);
            f.render_widget(Paragraph::new("│").style(grip_style), grip);
            handles.register_resize_grip(slot.id, grip);
        }
    }
}

fn render_body(
    f: &mut Frame,
    area: Rect,
    ctx: &GridRenderContext,
    slots: &[ColumnSlot],
    row_offset: usize,
    handles: &mut CellHandleMap,
) {
    if ctx.view.is_empty() {
        let message = if ctx.view.row_count() == 0 {
            "No rows to display"
        } else {
            "All columns are hidden - press 1-9 to show one"
        };
        f.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::Yellow)),
            area,
        );
        return;
    }

    let visible_rows = (area.height as usize).min(ctx.view.row_count().saturating_sub(row_offset));
    for line in 0..visible_rows {
        let row = row_offset + line;
        let y = area.y + line as u16;

        if ctx.show_row_numbers {
            f.render_widget(
                Paragraph::new((row + 1).to_string()).style(Style::default().fg(Color::DarkGray)),
                Rect::new(area.x, y, GUTTER_WIDTH.saturating_sub(1).min(area.width), 1),
            );
        }

        for slot in slots {
            let Ok((_, value)) = ctx.view.cell_at(row, slot.visible_index) else {
                continue;
            };
            let rect = Rect::new(slot.x, y, slot.width, 1);
            let style = if ctx.is_focused_cell(row, slot.visible_index) {
                ctx.focus_style
            } else {
                Style::default()
            };
            f.render_widget(Paragraph::new(value).style(style), rect);
            handles.register_cell(CellCoord::new(row, slot.visible_index), rect);
        }
    }
}

/// Modal popup holding the draft, with the terminal cursor inside it
fn render_edit_popup(f: &mut Frame, area: Rect, ctx: &GridRenderContext) {
    let Some(edit) = &ctx.edit else {
        return;
    };

    let popup = centered_rect(60, 3, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Edit {} (row {})", edit.column_label, edit.row + 1))
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);

    // Keep the cursor visible when the draft is wider than the popup
    let width = inner.width.max(1) as usize;
    let scroll = edit.cursor.saturating_sub(width - 1);

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(edit.draft)
            .block(block)
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
        popup,
    );

    let cursor_x = inner.x + u16::try_from(edit.cursor - scroll).unwrap_or(0);
    f.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
}

/// A rect `percent_x` wide and `height` rows tall in the middle of `r`
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::data_provider::{DataProvider, DefaultDataProvider};
    use crate::data::datatable::GridStore;
    use crate::ui::focus_controller::FocusController;
    use crate::ui::rendering::GridRenderContextBuilder;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_rows_and_registers_cells() {
        let store = GridStore::new(DefaultDataProvider.load().unwrap());
        let controller = FocusController::new();
        let mut ring = FocusRing::new();
        let mut handles = CellHandleMap::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();

        terminal
            .draw(|f| {
                let ctx = GridRenderContextBuilder::new(store.view())
                    .focus(&controller)
                    .display_options("Team", false, true)
                    .build();
                render_grid(f, f.area(), &ctx, &mut ring, &mut handles);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Alice Johnson"));
        assert!(text.contains("[x] Role"));
        assert_eq!(handles.cell_count(), 12);

        // Cells in one row share a line, left to right
        let first = handles.cell_area(CellCoord::new(0, 0)).unwrap();
        let second = handles.cell_area(CellCoord::new(0, 1)).unwrap();
        assert_eq!(first.y, second.y);
        assert!(second.x > first.right());
        assert_eq!(handles.resize_grip_at(first.right(), first.y - 1), Some("name"));
    }

    #[test]
    fn test_hidden_column_is_not_drawn() {
        let mut store = GridStore::new(DefaultDataProvider.load().unwrap());
        store.set_column_visible("role", false);
        let controller = FocusController::new();
        let mut ring = FocusRing::new();
        let mut handles = CellHandleMap::new();
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();

        terminal
            .draw(|f| {
                let ctx = GridRenderContextBuilder::new(store.view())
                    .display_options("Team", false, true)
                    .focus(&controller)
                    .build();
                render_grid(f, f.area(), &ctx, &mut ring, &mut handles);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(!text.contains("Designer"));
        assert!(text.contains("[ ] Role"));
        assert_eq!(handles.cell_count(), 9);
        assert_eq!(handles.toggle_at(toggle_x(&text, "2:[ ] Role"), 1), Some("role"));
    }

    // Screen column where `label` starts on the toggle line
    fn toggle_x(text: &str, label: &str) -> u16 {
        let line = text.lines().nth(1).unwrap_or_default();
        let byte_idx = line.find(label).unwrap();
        line[..byte_idx].chars().count() as u16
    }
}
