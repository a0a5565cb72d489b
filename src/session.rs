// filepath: src/session.rs
//! Drawing session for wl-paint
//!
//! The session owns everything the user edits: the stroke store, the
//! current brush, and the raster surface strokes are rendered into.
//! Input handlers never touch this state directly; they turn input into
//! a `PaintEvent` and hand it to `Session::handle`.

use crate::config::{PaintConfig, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::export::ImageFormat;
use crate::render::{self, Surface};
use crate::store::StrokeStore;
use crate::stroke::{Point, Rgba, Stroke};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything the user can ask the canvas to do
#[derive(Debug, Clone, PartialEq)]
pub enum PaintEvent {
    /// Primary button pressed on the canvas
    Press(Point),

    /// Pointer moved while the primary button is held
    Drag(Point),

    /// Primary button released (or the pointer left mid-stroke)
    Release,

    Undo,
    Redo,

    /// Remove every stroke
    Clear,

    SetColor(Rgba),
    NextColor,
    PreviousColor,

    /// Set the brush width; clamped to the allowed range
    SetBrushSize(u32),
    GrowBrush,
    ShrinkBrush,

    /// Save to an auto-named file in the configured directory
    Save(ImageFormat),

    /// Save to an explicit path
    SaveAs(PathBuf, ImageFormat),

    /// The window was resized
    Resize { width: u32, height: u32 },
}

/// User-facing result of a save
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Saved(PathBuf),
    SaveFailed(String),
}

impl Notice {
    pub fn title(&self) -> String {
        match self {
            Notice::Saved(path) => format!("wl-paint - saved {}", path.display()),
            Notice::SaveFailed(_) => "wl-paint - save failed".to_string(),
        }
    }
}

/// What the window has to do after an event
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Response {
    pub redraw: bool,
    pub notice: Option<Notice>,
}

pub struct Session {
    store: StrokeStore,
    surface: Surface,
    color: Rgba,
    palette: Vec<Rgba>,
    brush_size: u32,
    export_dir: Option<PathBuf>,
    file_prefix: String,
}

impl Session {
    pub fn new(config: &PaintConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config.clone().sanitized();
        let surface = Surface::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.background,
        )
        .ok_or("canvas dimensions must be non-zero")?;

        Ok(Self {
            store: StrokeStore::with_policy(config.history.redo_policy()),
            surface,
            color: config.brush.color,
            palette: config.brush.palette,
            brush_size: config.brush.size,
            export_dir: config.export.directory,
            file_prefix: config.export.file_prefix,
        })
    }

    pub fn handle(&mut self, event: PaintEvent) -> Response {
        debug!("Session::handle: {:?}", event);
        let mut notice = None;

        match event {
            PaintEvent::Press(point) => self.store.begin_stroke(point, self.color, self.brush_size),
            PaintEvent::Drag(point) => self.store.extend_stroke(point),
            PaintEvent::Release => self.store.end_stroke(),
            PaintEvent::Undo => self.store.undo(),
            PaintEvent::Redo => self.store.redo(),
            PaintEvent::Clear => self.store.clear(),
            PaintEvent::SetColor(color) => self.color = color,
            PaintEvent::NextColor => self.step_palette(1),
            PaintEvent::PreviousColor => self.step_palette(-1),
            PaintEvent::SetBrushSize(size) => self.set_brush_size(size),
            PaintEvent::GrowBrush => self.set_brush_size(self.brush_size.saturating_add(1)),
            PaintEvent::ShrinkBrush => self.set_brush_size(self.brush_size.saturating_sub(1)),
            PaintEvent::Save(format) => {
                let path = self.next_export_path();
                notice = Some(self.save(&path, format));
            }
            PaintEvent::SaveAs(path, format) => notice = Some(self.save(&path, format)),
            PaintEvent::Resize { width, height } => {
                if (width, height) != (self.surface.width(), self.surface.height()) {
                    if self.surface.resize(width, height) {
                        render::render(&mut self.surface, self.store.visible());
                        return Response {
                            redraw: true,
                            notice: None,
                        };
                    }
                    debug!("Ignoring resize to {}x{}", width, height);
                }
            }
        }

        let redraw = self.store.take_dirty();
        if redraw {
            render::render(&mut self.surface, self.store.visible());
        }
        Response { redraw, notice }
    }

    fn save(&mut self, path: &Path, format: ImageFormat) -> Notice {
        render::render(&mut self.surface, self.store.visible());
        match render::export_to_file(&self.surface, path, format) {
            Ok(written) => {
                info!("Saved drawing to {}", written.display());
                Notice::Saved(written)
            }
            Err(err) => {
                error!("Could not save drawing: {}", err);
                Notice::SaveFailed(err.to_string())
            }
        }
    }

    /// `<dir>/<prefix>-<unix seconds>`; the extension is added on export
    fn next_export_path(&self) -> PathBuf {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let name = format!("{}-{}", self.file_prefix, secs);
        match &self.export_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        info!("Brush size: {}", self.brush_size);
    }

    fn step_palette(&mut self, step: isize) {
        if self.palette.is_empty() {
            return;
        }
        let len = self.palette.len() as isize;
        let next = match self.palette.iter().position(|c| *c == self.color) {
            Some(idx) => (idx as isize + step).rem_euclid(len),
            None => 0,
        };
        self.color = self.palette[next as usize];
        info!("Brush color: {:?}", self.color);
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.store.strokes()
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }
}
