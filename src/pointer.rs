// filepath: src/pointer.rs
//! Pointer (mouse) event handling for wl-paint

use crate::app::AppData;
use log::debug;
use smithay_client_toolkit::seat::pointer::{PointerEvent, PointerEventKind};

pub fn handle_pointer_events(events: &[PointerEvent], app: &mut AppData) {
    debug!("handle_pointer_events: {} events", events.len());
    for event in events {
        let (x, y) = event.position;
        let paint_event = match event.kind {
            PointerEventKind::Press { button, .. } => app.tracker.press(button, x, y),
            PointerEventKind::Motion { .. } => app.tracker.motion(x, y),
            PointerEventKind::Release { button, .. } => app.tracker.release(button),
            PointerEventKind::Leave { .. } => {
                debug!("Pointer left canvas");
                app.tracker.leave()
            }
            _ => None,
        };

        if let Some(paint_event) = paint_event {
            app.dispatch(paint_event);
        }
    }

    if let Err(err) = app.flush() {
        log::error!("Failed to redraw canvas: {}", err);
    }
}
