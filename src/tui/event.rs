use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// TUI-specific input events.
///
/// Letter keys arrive as `InputChar`; whoever has focus decides whether
/// they are commands (browse mode) or text (ask box, search box).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    ForceQuit, // Ctrl+C, always quits
    Submit,
    Escape,
    InputChar(char),
    Paste(String), // Bracketed paste
    Backspace,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Home,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).unwrap_or(false) {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) => map_key(key_event),
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Ignore key releases reported by terminals with keyboard enhancement
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    let control = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Char('c') if control => Some(TuiEvent::ForceQuit),
        // Other Ctrl chords are unbound; they must not type or trigger letter commands
        KeyCode::Char(_) if control => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Home => Some(TuiEvent::Home),
        _ => None,
    }
}
