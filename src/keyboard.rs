// filepath: src/keyboard.rs
//! Keyboard shortcut handling for wl-paint

use crate::app::AppData;
use crate::input::{map_key, Key, KeyModifiers};
use log::debug;
use smithay_client_toolkit::seat::keyboard::{KeyEvent, Keysym, Modifiers};

pub fn modifiers_from(modifiers: &Modifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.ctrl,
        shift: modifiers.shift,
    }
}

fn key_from(keysym: Keysym) -> Option<Key> {
    if keysym == Keysym::Escape {
        return Some(Key::Escape);
    }
    keysym.key_char().map(Key::Char)
}

pub fn handle_key_press(event: &KeyEvent, app: &mut AppData) {
    let Some(key) = key_from(event.keysym) else {
        return;
    };
    let mods = app.keyboard_mods;
    debug!("Key press: {:?} {:?}", key, mods);

    if let Some(action) = map_key(key, mods, app.save_format()) {
        app.handle_key_action(action);
    }

    if let Err(err) = app.flush() {
        log::error!("Failed to redraw canvas: {}", err);
    }
}
