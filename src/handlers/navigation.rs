// Key handler for the grid
// Maps raw key events to actions; holds no grid state of its own

use crate::ui::actions::{Action, GridInput, NavigateAction, ResizeDirection};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Whether keys currently go to the grid or to the edit popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Grid,
    Editing,
}

pub struct NavigationHandler {
    vim_mode: bool,
}

impl NavigationHandler {
    pub fn new(vim_mode: bool) -> Self {
        NavigationHandler { vim_mode }
    }

    /// Convert a key to an action. Returns None for keys the grid ignores.
    pub fn handle_key(&self, key: KeyEvent, mode: InputMode) -> Option<Action> {
        // Some terminals report releases too; only presses drive the grid
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match mode {
            InputMode::Editing => Some(self.handle_edit_key(key)),
            InputMode::Grid => self.handle_grid_key(key),
        }
    }

    fn handle_edit_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => GridInput::ConfirmEdit.into(),
            KeyCode::Esc => GridInput::CancelEdit.into(),
            _ => GridInput::EditKey(key).into(),
        }
    }

    fn handle_grid_key(&self, key: KeyEvent) -> Option<Action> {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        match key.code {
            KeyCode::Up if plain => Some(navigate(NavigateAction::Up)),
            KeyCode::Down if plain => Some(navigate(NavigateAction::Down)),
            KeyCode::Left if plain => Some(navigate(NavigateAction::Left)),
            KeyCode::Right if plain => Some(navigate(NavigateAction::Right)),

            KeyCode::Char('k') if self.vim_mode && plain => Some(navigate(NavigateAction::Up)),
            KeyCode::Char('j') if self.vim_mode && plain => Some(navigate(NavigateAction::Down)),
            KeyCode::Char('h') if self.vim_mode && plain => Some(navigate(NavigateAction::Left)),
            KeyCode::Char('l') if self.vim_mode && plain => Some(navigate(NavigateAction::Right)),

            KeyCode::Enter => Some(GridInput::Commit.into()),
            KeyCode::Tab => Some(Action::FocusFirstCell),

            KeyCode::Char(c @ '1'..='9') if plain => {
                let position = c.to_digit(10).map(|d| d as usize - 1)?;
                Some(Action::ToggleColumn(position))
            }
            KeyCode::Char('<') => Some(Action::ResizeFocusedColumn(ResizeDirection::Narrower)),
            KeyCode::Char('>') => Some(Action::ResizeFocusedColumn(ResizeDirection::Wider)),

            KeyCode::F(1) | KeyCode::Char('?') => Some(Action::ShowHelp),
            KeyCode::F(12) => Some(Action::ToggleDebug),
            KeyCode::Char('q') if plain => Some(Action::Quit),

            _ => None,
        }
    }

    /// Check if a key is one of the grid's navigation keys
    pub fn is_navigation_key(&self, key: &KeyEvent) -> bool {
        matches!(
            self.handle_key(*key, InputMode::Grid),
            Some(Action::Grid(GridInput::Navigate(_)))
        )
    }
}

fn navigate(direction: NavigateAction) -> Action {
    GridInput::Navigate(direction).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_arrow_keys() {
        let handler = NavigationHandler::new(false);

        assert_eq!(
            handler.handle_key(key(KeyCode::Up), InputMode::Grid),
            Some(navigate(NavigateAction::Up))
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Down), InputMode::Grid),
            Some(navigate(NavigateAction::Down))
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Left), InputMode::Grid),
            Some(navigate(NavigateAction::Left))
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Right), InputMode::Grid),
            Some(navigate(NavigateAction::Right))
        );
    }

    #[test]
    fn test_vim_keys_only_in_vim_mode() {
        let plain = NavigationHandler::new(false);
        let vim = NavigationHandler::new(true);
        let j_key = key(KeyCode::Char('j'));

        assert_eq!(plain.handle_key(j_key, InputMode::Grid), None);
        assert_eq!(
            vim.handle_key(j_key, InputMode::Grid),
            Some(navigate(NavigateAction::Down))
        );
        assert!(vim.is_navigation_key(&j_key));
    }

    #[test]
    fn test_enter_depends_on_mode() {
        let handler = NavigationHandler::new(false);
        let enter = key(KeyCode::Enter);

        assert_eq!(
            handler.handle_key(enter, InputMode::Grid),
            Some(GridInput::Commit.into())
        );
        assert_eq!(
            handler.handle_key(enter, InputMode::Editing),
            Some(GridInput::ConfirmEdit.into())
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Esc), InputMode::Editing),
            Some(GridInput::CancelEdit.into())
        );
    }

    #[test]
    fn test_editing_captures_grid_keys() {
        let handler = NavigationHandler::new(true);
        let q_key = key(KeyCode::Char('q'));
        let down = key(KeyCode::Down);

        assert_eq!(
            handler.handle_key(q_key, InputMode::Editing),
            Some(GridInput::EditKey(q_key).into())
        );
        assert_eq!(
            handler.handle_key(down, InputMode::Editing),
            Some(GridInput::EditKey(down).into())
        );
    }

    #[test]
    fn test_column_toggle_digits() {
        let handler = NavigationHandler::new(false);
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('1')), InputMode::Grid),
            Some(Action::ToggleColumn(0))
        );
        assert_eq!(
            handler.handle_key(key(KeyCode::Char('4')), InputMode::Grid),
            Some(Action::ToggleColumn(3))
        );
        assert_eq!(handler.handle_key(key(KeyCode::Char('0')), InputMode::Grid), None);
    }

    #[test]
    fn test_release_events_ignored() {
        let handler = NavigationHandler::new(false);
        let mut release = key(KeyCode::Down);
        release.kind = KeyEventKind::Release;
        assert_eq!(handler.handle_key(release, InputMode::Grid), None);
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        let handler = NavigationHandler::new(false);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key(ctrl_c, InputMode::Grid), Some(Action::Quit));
        assert_eq!(handler.handle_key(ctrl_c, InputMode::Editing), Some(Action::Quit));
    }
}
