pub mod app;
pub mod config;
pub mod export;
pub mod input;
pub mod keyboard;
pub mod pointer;
pub mod render;
pub mod session;
pub mod store;
pub mod stroke;
pub mod wayland;

// Re-export the GUI-independent core
pub use crate::render::Surface;
pub use crate::session::{PaintEvent, Session};
pub use crate::store::{RedoPolicy, StrokeStore};
pub use crate::stroke::{Point, Rgba, Stroke};
