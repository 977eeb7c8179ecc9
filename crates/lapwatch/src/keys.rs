//! Key bindings.

use crate::app::Msg;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use lapwatch_core::{Control, Controls};

/// Key hint shown next to a control's label.
pub fn key_hint(control: Control) -> &'static str {
    match control {
        Control::Start | Control::Stop => "s",
        Control::Lap => "l",
        Control::Reset => "r",
    }
}

/// Translate a key press into a message.
///
/// Stopwatch actions are only produced when `controls` currently offers
/// them, so e.g. `r` does nothing while running and `l` does nothing while
/// stopped. `s` and space send [`Msg::Toggle`] whenever start or stop is
/// offered. Quit and suspend are always available.
pub fn map_key(key: KeyEvent, controls: &Controls) -> Option<Msg> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Msg::Quit),
            KeyCode::Char('z') => Some(Msg::Suspend),
            _ => None,
        };
    }

    let offered = |control: Control| controls.offers(control);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
        KeyCode::Char('s') | KeyCode::Char(' ')
            if offered(Control::Start) || offered(Control::Stop) =>
        {
            Some(Msg::Toggle)
        }
        KeyCode::Char('l') | KeyCode::Enter if offered(Control::Lap) => Some(Msg::Lap),
        KeyCode::Char('r') if offered(Control::Reset) => Some(Msg::Reset),
        _ => None,
    }
}
