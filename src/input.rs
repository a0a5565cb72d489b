// filepath: src/input.rs
//! Input translation for wl-paint
//!
//! Maps raw pointer and keyboard state onto `PaintEvent`s. Kept free of
//! Wayland types so the bindings can be tested without a compositor.

use crate::export::ImageFormat;
use crate::session::PaintEvent;
use crate::stroke::Point;

/// Linux evdev code for the left mouse button
pub const BTN_LEFT: u32 = 0x110;

/// A key press reduced to what the bindings care about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Result of a key press
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Paint(PaintEvent),
    Quit,
}

/// Resolve a key press to an action. `save_format` is what plain Ctrl+S writes.
pub fn map_key(key: Key, mods: KeyModifiers, save_format: ImageFormat) -> Option<KeyAction> {
    let c = match key {
        Key::Escape => return Some(KeyAction::Quit),
        Key::Char(c) => c.to_ascii_lowercase(),
    };

    let event = if mods.ctrl {
        match (c, mods.shift) {
            ('z', false) => PaintEvent::Undo,
            ('z', true) | ('y', _) => PaintEvent::Redo,
            ('s', false) => PaintEvent::Save(save_format),
            ('s', true) => PaintEvent::Save(save_format.alternate()),
            ('n', _) => PaintEvent::Clear,
            _ => return None,
        }
    } else {
        match c {
            'c' if mods.shift => PaintEvent::PreviousColor,
            'c' => PaintEvent::NextColor,
            ']' | '+' | '=' => PaintEvent::GrowBrush,
            '[' | '-' => PaintEvent::ShrinkBrush,
            '0' => PaintEvent::SetBrushSize(10),
            '1'..='9' => PaintEvent::SetBrushSize(c.to_digit(10)?),
            _ => return None,
        }
    };
    Some(KeyAction::Paint(event))
}

/// Tracks the primary button so motion only extends a stroke while held
#[derive(Debug, Default)]
pub struct PointerTracker {
    drawing: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn press(&mut self, button: u32, x: f64, y: f64) -> Option<PaintEvent> {
        if button != BTN_LEFT || self.drawing {
            return None;
        }
        self.drawing = true;
        Some(PaintEvent::Press(Point::from_surface(x, y)))
    }

    pub fn motion(&self, x: f64, y: f64) -> Option<PaintEvent> {
        self.drawing
            .then(|| PaintEvent::Drag(Point::from_surface(x, y)))
    }

    pub fn release(&mut self, button: u32) -> Option<PaintEvent> {
        if button != BTN_LEFT {
            return None;
        }
        self.finish()
    }

    /// Pointer left the surface; a stroke in progress ends here
    pub fn leave(&mut self) -> Option<PaintEvent> {
        self.finish()
    }

    fn finish(&mut self) -> Option<PaintEvent> {
        std::mem::take(&mut self.drawing).then_some(PaintEvent::Release)
    }
}
