// filepath: src/render.rs
//! Stroke rendering for wl-paint
//!
//! Strokes are redrawn from scratch into a tiny-skia pixmap whenever the
//! canvas is invalidated. Each polyline is smoothed into a chain of
//! quadratic segments: the previous sample is the control point and the
//! midpoint between samples is the end point.

use crate::export::{self, ExportError, ImageFormat};
use crate::stroke::{Point, Rgba, Stroke};
use std::path::{Path, PathBuf};
use tiny_skia::{LineCap, LineJoin, Paint, Path as SkiaPath, PathBuilder, Pixmap, Transform};

/// Raster surface the canvas is drawn into
pub struct Surface {
    pixmap: Pixmap,
    background: Rgba,
}

impl Surface {
    /// Create a surface; `None` if either dimension is zero
    pub fn new(width: u32, height: u32, background: Rgba) -> Option<Self> {
        let mut pixmap = Pixmap::new(width, height)?;
        pixmap.fill(skia_color(background));
        Some(Self { pixmap, background })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Reallocate for a new size. Contents are cleared; callers re-render.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == self.width() && height == self.height() {
            return true;
        }
        match Pixmap::new(width, height) {
            Some(mut pixmap) => {
                pixmap.fill(skia_color(self.background));
                self.pixmap = pixmap;
                true
            }
            None => false,
        }
    }

    /// Straight-alpha color of one pixel, `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        // Pixmap::pixel only bounds-checks the flat index
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }
}

/// Clear `surface` and draw every stroke in order
pub fn render<'a>(surface: &mut Surface, strokes: impl IntoIterator<Item = &'a Stroke>) {
    surface.pixmap.fill(skia_color(surface.background));
    for stroke in strokes {
        draw_stroke(&mut surface.pixmap, stroke);
    }
}

fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke) {
    if stroke.len() < 2 {
        return;
    }

    let mut paint = Paint::default();
    let color = stroke.color();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;

    let width = stroke.width() as f32;
    match smoothed_path(stroke.points()) {
        Some(path) => {
            let style = tiny_skia::Stroke {
                width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..tiny_skia::Stroke::default()
            };
            pixmap.stroke_path(&path, &paint, &style, Transform::identity(), None);
        }
        None => {
            // Every sample at the same spot: a round cap alone
            let first = stroke.points()[0];
            if let Some(dot) = PathBuilder::from_circle(first.x as f32, first.y as f32, width / 2.0)
            {
                pixmap.fill_path(
                    &dot,
                    &paint,
                    tiny_skia::FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
    }
}

/// Build the quadratic chain through `points`, `None` when it has no extent
pub fn smoothed_path(points: &[Point]) -> Option<SkiaPath> {
    let (first, _) = points.split_first()?;
    if points.iter().all(|p| p == first) {
        return None;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for pair in points.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let mid_x = (prev.x + cur.x) as f32 / 2.0;
        let mid_y = (prev.y + cur.y) as f32 / 2.0;
        pb.quad_to(prev.x as f32, prev.y as f32, mid_x, mid_y);
    }
    pb.finish()
}

/// Write the surface to `path` in `format`, returning the path actually written.
/// A path that already ends in the format's extension is kept as is rather
/// than getting the extension appended a second time.
pub fn export_to_file(
    surface: &Surface,
    path: &Path,
    format: ImageFormat,
) -> Result<PathBuf, ExportError> {
    export::export_to_file(&surface.pixmap, path, format)
}

/// Copy the surface into a wl_shm `Argb8888` buffer (premultiplied BGRA in memory)
pub fn present(surface: &Surface, dst: &mut [u8]) {
    for (out, px) in dst.chunks_exact_mut(4).zip(surface.pixmap.pixels()) {
        out.copy_from_slice(&[px.blue(), px.green(), px.red(), px.alpha()]);
    }
}

fn skia_color(c: Rgba) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stroke(points: &[(i32, i32)], color: Rgba, width: u32) -> Stroke {
        let mut s = Stroke::new(Point::new(points[0].0, points[0].1), color, width);
        for &(x, y) in &points[1..] {
            s.push(Point::new(x, y));
        }
        s
    }

    fn is_dark(c: Rgba) -> bool {
        c.r < 64 && c.g < 64 && c.b < 64
    }

    #[test]
    fn empty_canvas_is_background() {
        let mut surface = Surface::new(20, 20, Rgba::WHITE).unwrap();
        render(&mut surface, &[]);
        assert_eq!(surface.pixel(10, 10), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(20, 0), None);
        assert_eq!(surface.pixel(0, 20), None);
    }

    #[test]
    fn pixel_past_right_edge_does_not_wrap() {
        let mut surface = Surface::new(4, 2, Rgba::WHITE).unwrap();
        render(&mut surface, &[stroke(&[(0, 1), (4, 1)], Rgba::BLACK, 2)]);
        assert!(surface.pixel(0, 1).is_some());
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(surface.pixel(5, 0), None);
        assert_eq!(surface.pixel(3, 2), None);
    }

    #[test]
    fn horizontal_stroke_covers_its_width() {
        let mut surface = Surface::new(100, 100, Rgba::WHITE).unwrap();
        render(&mut surface, &[stroke(&[(10, 50), (90, 50)], Rgba::BLACK, 5)]);

        // The chain ends at the midpoint of the final segment
        for x in [15, 30, 45] {
            assert!(is_dark(surface.pixel(x, 50).unwrap()), "x={x}");
            assert!(is_dark(surface.pixel(x, 49).unwrap()), "x={x}");
        }
        assert_eq!(surface.pixel(30, 44), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(30, 56), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(70, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn later_strokes_draw_over_earlier_ones() {
        let red = Rgba::new(255, 0, 0, 255);
        let mut surface = Surface::new(60, 60, Rgba::WHITE).unwrap();
        render(
            &mut surface,
            &[
                stroke(&[(30, 0), (30, 30), (30, 60)], Rgba::BLACK, 8),
                stroke(&[(0, 30), (30, 30), (60, 30)], red, 8),
            ],
        );
        assert_eq!(surface.pixel(30, 30), Some(red));
    }

    #[test]
    fn single_point_strokes_are_skipped() {
        let mut surface = Surface::new(20, 20, Rgba::WHITE).unwrap();
        render(&mut surface, &[Stroke::new(Point::new(10, 10), Rgba::BLACK, 8)]);
        assert_eq!(surface.pixel(10, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn stationary_drag_draws_a_dot() {
        let mut surface = Surface::new(20, 20, Rgba::WHITE).unwrap();
        render(&mut surface, &[stroke(&[(10, 10), (10, 10)], Rgba::BLACK, 6)]);
        assert!(is_dark(surface.pixel(10, 10).unwrap()));
        assert_eq!(surface.pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn smoothed_path_ends_at_last_midpoint() {
        let path = smoothed_path(&[Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)])
            .unwrap();
        let last = path.points().last().copied().unwrap();
        assert_eq!((last.x, last.y), (10.0, 5.0));
    }

    #[test]
    fn present_swizzles_to_bgra() {
        let mut surface = Surface::new(2, 1, Rgba::new(10, 20, 30, 255)).unwrap();
        render(&mut surface, &[]);
        let mut buf = vec![0u8; 8];
        present(&surface, &mut buf);
        assert_eq!(buf, vec![30, 20, 10, 255, 30, 20, 10, 255]);
    }

    #[test]
    fn resize_keeps_background() {
        let mut surface = Surface::new(4, 4, Rgba::WHITE).unwrap();
        assert!(surface.resize(8, 2));
        assert_eq!((surface.width(), surface.height()), (8, 2));
        assert_eq!(surface.pixel(7, 1), Some(Rgba::WHITE));
        assert!(!surface.resize(0, 2));
    }
}
