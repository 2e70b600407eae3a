//! Routes key presses to exactly one handler based on focus.
//!
//! The host keeps a single [`InputRouter`]. Open modals take every key; otherwise
//! the focused region (colour grid or type selector) gets first refusal and
//! anything it does not claim comes back to the host as [`Routed::Unhandled`].

use crate::grid::{Direction, GridCommand};
use crate::type_selector::SelectorKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Delete,
    Backspace,
    Enter,
    Escape,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn shifted(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                shift: true,
                ..Modifiers::default()
            },
        }
    }

    /// Alt, Ctrl or Meta held.
    fn has_command_modifier(&self) -> bool {
        self.modifiers.alt || self.modifiers.ctrl || self.modifiers.meta
    }
}

/// Region of the editor that owns the keyboard when no modal is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Grid,
    TypeSelector,
}

/// Text-entry overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    EditHex,
    Rename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    Grid(GridCommand),
    TypeSelector(SelectorKey),
    Modal(Modal, KeyInput),
    Unhandled(KeyInput),
}

#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    focus: Focus,
    modal: Option<Modal>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn route(&self, input: KeyInput) -> Routed {
        if let Some(modal) = self.modal {
            return Routed::Modal(modal, input);
        }
        match self.focus {
            Focus::Grid => route_grid(input),
            Focus::TypeSelector => route_type_selector(input),
        }
    }
}

fn route_grid(input: KeyInput) -> Routed {
    if input.has_command_modifier() {
        return Routed::Unhandled(input);
    }
    let direction = match input.key {
        Key::Up => Direction::Up,
        Key::Down => Direction::Down,
        Key::Left => Direction::Left,
        Key::Right => Direction::Right,
        Key::Delete | Key::Backspace => return Routed::Grid(GridCommand::DeleteSelected),
        _ => return Routed::Unhandled(input),
    };
    if input.modifiers.shift {
        Routed::Grid(GridCommand::Move(direction))
    } else {
        Routed::Grid(GridCommand::Select(direction))
    }
}

fn route_type_selector(input: KeyInput) -> Routed {
    match input.key {
        Key::Down => Routed::TypeSelector(SelectorKey::Next),
        Key::Up => Routed::TypeSelector(SelectorKey::Previous),
        Key::Enter => Routed::TypeSelector(SelectorKey::Toggle),
        _ => Routed::Unhandled(input),
    }
}
