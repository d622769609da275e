//! Input events delivered by the host UI.
//!
//! Positions are logical pixels relative to the overlay's top-left corner;
//! the host is responsible for subtracting the overlay's page offset.

use crate::coords::ScreenPos;
use crate::drawing::DrawingMode;

/// Keys the chart reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

impl Key {
    /// Whether this key deletes the selected annotation.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self, Key::Delete | Key::Backspace)
    }

    /// Drawing mode bound to this key, if any.
    #[must_use]
    pub fn mode_shortcut(&self) -> Option<DrawingMode> {
        match self {
            Key::Char(c) => DrawingMode::from_shortcut(*c),
            _ => None,
        }
    }
}

/// Raw pointer and keyboard input, processed strictly in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button click.
    Click(ScreenPos),
    /// Pointer moved over the plot.
    Move(ScreenPos),
    /// Key pressed while the chart has focus.
    Key(Key),
}
