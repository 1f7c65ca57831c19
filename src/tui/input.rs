use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseEventKind};
use crate::shared::InputEvent;

// poll for input from the terminal; a click anywhere toggles mute like a key does
pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key.code).into_iter().collect()),
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => Ok(vec![InputEvent::ToggleMute]),
        _ => Ok(vec![]),
    }
}

fn handle_key(code: KeyCode) -> Option<InputEvent> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => Some(InputEvent::Quit),
        KeyCode::Char(' ') | KeyCode::Char('m') => Some(InputEvent::ToggleMute),
        _ => None,
    }
}
