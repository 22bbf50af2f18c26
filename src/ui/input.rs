use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::Tab;

/// Everything the app reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PrevTab,
    Insert(char),
    Paste(String),
    Newline,
    Backspace,
    ClearInput,
    /// Select the file at the typed path
    SelectPath,
    Submit,
    Tick,
    None,
}

/// Map a crossterm terminal event to an action for the active tab.
pub fn map_event(event: &Event, tab: Tab) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key, tab),
        Event::Paste(text) => Action::Paste(text.clone()),
        _ => Action::None,
    }
}

fn map_key(key: &KeyEvent, tab: Tab) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('s') => Action::Submit,
            KeyCode::Char('u') => Action::ClearInput,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab => Action::NextTab,
        KeyCode::BackTab => Action::PrevTab,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Enter => match tab {
            Tab::Text => Action::Newline,
            Tab::Document => Action::SelectPath,
        },
        KeyCode::Char(c) => Action::Insert(c),
        _ => Action::None,
    }
}
