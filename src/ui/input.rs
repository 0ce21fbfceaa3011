//! Keyboard mapping
//!
//! Translates crossterm key events into UI commands for the current mode.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::board::Column;

/// What the keyboard is currently driving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating the board
    Board,
    /// Typing a name into the prompt
    Prompt,
    /// Help overlay is open
    Help,
}

/// Command that can be triggered from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    // Board navigation
    FocusColumn(Column),
    SwitchColumn,
    MoveCursor(i32),
    /// Click the card under the keyboard cursor
    Activate,
    ClearSelection,

    // Creation
    NewGroup,
    NewCard,

    // Prompt editing
    PromptInsert(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    // System
    Save,
    Load,
    ToggleHelp,
    Quit,
}

/// Map a key press to a command, if it means anything in `mode`
pub fn map_key(key: KeyEvent, mode: InputMode) -> Option<UiCommand> {
    // Only handle key press events, not releases
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global quit shortcut
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(UiCommand::Quit);
    }

    match mode {
        InputMode::Prompt => match key.code {
            KeyCode::Enter => Some(UiCommand::PromptSubmit),
            KeyCode::Esc => Some(UiCommand::PromptCancel),
            KeyCode::Backspace => Some(UiCommand::PromptBackspace),
            KeyCode::Char(c) if !ctrl => Some(UiCommand::PromptInsert(c)),
            _ => None,
        },
        InputMode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => {
                Some(UiCommand::ToggleHelp)
            }
            _ => None,
        },
        InputMode::Board => {
            if ctrl {
                return match key.code {
                    KeyCode::Char('s') => Some(UiCommand::Save),
                    KeyCode::Char('o') => Some(UiCommand::Load),
                    _ => None,
                };
            }

            match key.code {
                KeyCode::Tab | KeyCode::BackTab => Some(UiCommand::SwitchColumn),
                KeyCode::Left | KeyCode::Char('h') => Some(UiCommand::FocusColumn(Column::Left)),
                KeyCode::Right | KeyCode::Char('l') => Some(UiCommand::FocusColumn(Column::Right)),
                KeyCode::Up | KeyCode::Char('k') => Some(UiCommand::MoveCursor(-1)),
                KeyCode::Down | KeyCode::Char('j') => Some(UiCommand::MoveCursor(1)),
                KeyCode::Enter | KeyCode::Char(' ') => Some(UiCommand::Activate),
                KeyCode::Esc => Some(UiCommand::ClearSelection),
                KeyCode::Char('g') => Some(UiCommand::NewGroup),
                KeyCode::Char('c') => Some(UiCommand::NewCard),
                KeyCode::Char('?') => Some(UiCommand::ToggleHelp),
                KeyCode::Char('q') => Some(UiCommand::Quit),
                _ => None,
            }
        }
    }
}

/// Key bindings shown in the help overlay
pub const HELP_LINES: &[(&str, &str)] = &[
    ("Click", "Select a card / link with the opposite column"),
    ("Tab ←→", "Switch column"),
    ("↑↓ jk", "Move cursor"),
    ("Enter", "Select / link card under cursor"),
    ("Esc", "Clear selection"),
    ("g", "New group in column"),
    ("c", "New card in group"),
    ("Ctrl+S", "Save board"),
    ("Ctrl+O", "Load board"),
    ("?", "Toggle help"),
    ("q", "Quit"),
];
