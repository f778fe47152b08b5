use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Control;
use crate::snake::Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(Control),
    Quit,
}

/// Keys without a binding still reach the game as `Control::Other`.
pub fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Game(Control::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Game(Control::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Game(Control::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Game(Control::Turn(Right)),
        KeyCode::Char(' ') | KeyCode::Esc => KeyAction::Game(Control::StartOrPause),
        KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        _ => KeyAction::Game(Control::Other),
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
