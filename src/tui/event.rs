use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Viewer-level intents. Everything except `Quit` and `Resize` turns into an
/// action sent to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Quit,
    Resize,
    PresentChild,
    PresentFirstGrandchild,
    PresentSecondGrandchild,
    /// Tap "Dismiss" on the topmost sheet.
    Dismiss,
}

/// Poll for an event with timeout (blocks up to 100ms)
pub fn poll_event() -> Option<ViewEvent> {
    poll_event_timeout(Duration::from_millis(100))
}

fn poll_event_timeout(timeout: Duration) -> Option<ViewEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            log::debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
            map_key(key.code, key.modifiers)
        }
        Ok(Event::Resize(..)) => Some(ViewEvent::Resize),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<ViewEvent> {
    match (modifiers, code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(ViewEvent::Quit),
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Some(ViewEvent::Quit),
        (_, KeyCode::Char('p')) => Some(ViewEvent::PresentChild),
        (_, KeyCode::Char('1')) => Some(ViewEvent::PresentFirstGrandchild),
        (_, KeyCode::Char('2')) => Some(ViewEvent::PresentSecondGrandchild),
        (_, KeyCode::Char('d')) | (_, KeyCode::Enter) => Some(ViewEvent::Dismiss),
        _ => None,
    }
}
