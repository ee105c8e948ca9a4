use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Axis;
use crate::engine::{Controls, ROTATION_STEP};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    TogglePause,
    /// Signed rotation rate for one axis, in radians per tick.
    Rotate(Axis, f32),
    CycleMode,
    ToggleDebug,
    Quit,
}

/// Key bindings. Only presses count, so held keys and releases do nothing.
///
/// `w`/`s` spin about X, `a`/`d` about Y, `q`/`e` about Z, space pauses,
/// `m` cycles the render mode, `n` toggles debug normals and Esc or Ctrl-C
/// quits.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Char(' ') => Action::TogglePause,
        KeyCode::Char('w') | KeyCode::Char('W') => Action::Rotate(Axis::X, -ROTATION_STEP),
        KeyCode::Char('s') | KeyCode::Char('S') => Action::Rotate(Axis::X, ROTATION_STEP),
        KeyCode::Char('a') | KeyCode::Char('A') => Action::Rotate(Axis::Y, -ROTATION_STEP),
        KeyCode::Char('d') | KeyCode::Char('D') => Action::Rotate(Axis::Y, ROTATION_STEP),
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Rotate(Axis::Z, -ROTATION_STEP),
        KeyCode::Char('e') | KeyCode::Char('E') => Action::Rotate(Axis::Z, ROTATION_STEP),
        KeyCode::Char('m') | KeyCode::Char('M') => Action::CycleMode,
        KeyCode::Char('n') | KeyCode::Char('N') => Action::ToggleDebug,
        KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Apply an action to the shared controls. Returns false once the app
/// should quit.
pub fn apply(controls: &Controls, action: Action) -> bool {
    match action {
        Action::TogglePause => {
            controls.toggle_pause();
        }
        Action::Rotate(axis, delta) => {
            controls.set_axis_rotation(axis, delta);
        }
        Action::CycleMode => {
            controls.cycle_mode();
        }
        Action::ToggleDebug => {
            controls.toggle_debug();
        }
        Action::Quit => {
            controls.stop();
            return false;
        }
    }
    true
}
