// filepath: src/store.rs
//! Stroke store for wl-paint
//!
//! Holds the active strokes (what is on the canvas) and the undone strokes
//! (what redo can bring back). The stroke being drawn is kept apart and only
//! joins the active strokes on release, so history commands never see it.
//! Every operation is total: empty sequences turn undo/redo/extend/end into
//! no-ops.

use crate::stroke::{Point, Rgba, Stroke};
use log::debug;

/// What happens to the undone strokes when a new stroke is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedoPolicy {
    /// Undone strokes survive new drawing and stay redoable
    #[default]
    Keep,
    /// Starting a stroke discards the undone strokes
    ClearOnNewStroke,
}

#[derive(Debug, Default)]
pub struct StrokeStore {
    active: Vec<Stroke>,
    undone: Vec<Stroke>,
    drawing: Option<Stroke>,
    policy: RedoPolicy,
    dirty: bool,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RedoPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Start a stroke; one still in progress is finalized first
    pub fn begin_stroke(&mut self, point: Point, color: Rgba, width: u32) {
        if self.drawing.is_some() {
            self.end_stroke();
        }
        if self.policy == RedoPolicy::ClearOnNewStroke && !self.undone.is_empty() {
            debug!("Discarding {} undone strokes", self.undone.len());
            self.undone.clear();
        }
        self.drawing = Some(Stroke::new(point, color, width));
        self.dirty = true;
    }

    /// Append to the stroke in progress; no-op when nothing is being drawn
    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(stroke) = self.drawing.as_mut() {
            stroke.push(point);
            self.dirty = true;
        }
    }

    /// Finalize the stroke in progress, dropping it if it never got a second point
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.drawing.take() {
            if stroke.len() >= 2 {
                self.active.push(stroke);
            }
            self.dirty = true;
        }
    }

    pub fn undo(&mut self) {
        if let Some(stroke) = self.active.pop() {
            self.undone.push(stroke);
            self.dirty = true;
        }
    }

    pub fn redo(&mut self) {
        if let Some(stroke) = self.undone.pop() {
            self.active.push(stroke);
            self.dirty = true;
        }
    }

    /// Remove every stroke, including the redo buffer and any stroke in progress
    pub fn clear(&mut self) {
        self.active.clear();
        self.undone.clear();
        self.drawing = None;
        self.dirty = true;
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.active
    }

    pub fn undone(&self) -> &[Stroke] {
        &self.undone
    }

    pub fn in_progress(&self) -> Option<&Stroke> {
        self.drawing.as_ref()
    }

    /// Finalized strokes in drawing order, then the stroke in progress
    pub fn visible(&self) -> impl Iterator<Item = &Stroke> {
        self.active.iter().chain(self.drawing.as_ref())
    }

    pub fn can_undo(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the dirty flag and reset it
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draw(store: &mut StrokeStore, points: &[(i32, i32)], color: Rgba, width: u32) {
        let (first, rest) = points.split_first().unwrap();
        store.begin_stroke(Point::new(first.0, first.1), color, width);
        for &(x, y) in rest {
            store.extend_stroke(Point::new(x, y));
        }
        store.end_stroke();
    }

    #[test]
    fn press_drag_release_keeps_one_stroke() {
        let mut store = StrokeStore::new();
        draw(&mut store, &[(10, 10), (20, 10)], Rgba::BLACK, 5);

        assert_eq!(store.strokes().len(), 1);
        let stroke = &store.strokes()[0];
        assert_eq!(stroke.points(), &[Point::new(10, 10), Point::new(20, 10)]);
        assert_eq!(stroke.color(), Rgba::BLACK);
        assert_eq!(stroke.width(), 5);
    }

    #[test]
    fn press_release_without_drag_is_discarded() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(5, 5), Rgba::BLACK, 5);
        store.end_stroke();
        assert!(store.strokes().is_empty());
        assert!(store.undone().is_empty());
    }

    #[test]
    fn undo_redo_scenario() {
        let mut store = StrokeStore::new();
        draw(&mut store, &[(10, 10), (20, 10)], Rgba::BLACK, 5);
        let drawn = store.strokes().to_vec();

        store.undo();
        assert!(store.strokes().is_empty());
        assert_eq!(store.undone(), drawn.as_slice());

        store.redo();
        assert_eq!(store.strokes(), drawn.as_slice());
        assert!(store.undone().is_empty());
    }

    #[test]
    fn undo_then_redo_restores_order() {
        let mut store = StrokeStore::new();
        draw(&mut store, &[(0, 0), (1, 1)], Rgba::BLACK, 1);
        draw(&mut store, &[(2, 2), (3, 3), (4, 4)], Rgba::new(255, 0, 0, 255), 3);
        draw(&mut store, &[(5, 5), (6, 6)], Rgba::WHITE, 10);
        let before = store.strokes().to_vec();

        store.undo();
        store.redo();
        assert_eq!(store.strokes(), before.as_slice());

        store.undo();
        store.undo();
        store.redo();
        store.redo();
        assert_eq!(store.strokes(), before.as_slice());
    }

    #[test]
    fn empty_undo_and_redo_are_noops() {
        let mut store = StrokeStore::new();
        store.undo();
        store.redo();
        assert!(store.strokes().is_empty());
        assert!(store.undone().is_empty());
        assert!(!store.take_dirty());

        draw(&mut store, &[(0, 0), (1, 0)], Rgba::BLACK, 2);
        store.take_dirty();
        store.redo();
        assert_eq!(store.strokes().len(), 1);
        assert!(!store.is_dirty());
    }

    #[test]
    fn extend_and_end_on_empty_store_are_noops() {
        let mut store = StrokeStore::new();
        store.extend_stroke(Point::new(1, 1));
        store.end_stroke();
        assert!(store.strokes().is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn stroke_in_progress_is_not_active_until_release() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(0, 0), Rgba::BLACK, 2);
        store.extend_stroke(Point::new(4, 0));
        assert!(store.strokes().is_empty());
        assert_eq!(store.in_progress().map(Stroke::len), Some(2));
        assert_eq!(store.visible().count(), 1);

        store.end_stroke();
        assert_eq!(store.strokes().len(), 1);
        assert!(store.in_progress().is_none());
    }

    #[test]
    fn undo_mid_stroke_leaves_finished_strokes_alone() {
        let mut store = StrokeStore::new();
        draw(&mut store, &[(0, 0), (10, 0)], Rgba::BLACK, 2);
        let finished = store.strokes()[0].clone();

        store.begin_stroke(Point::new(30, 30), Rgba::BLACK, 2);
        store.undo();
        store.extend_stroke(Point::new(40, 40));
        store.end_stroke();
        assert_eq!(store.undone(), &[finished.clone()]);
        assert_eq!(
            store.strokes()[0].points(),
            &[Point::new(30, 30), Point::new(40, 40)]
        );

        store.redo();
        assert_eq!(store.strokes()[1], finished);
        assert!(store.strokes().iter().all(|s| s.len() >= 2));
        assert!(store.undone().is_empty());
    }

    #[test]
    fn redo_mid_stroke_cannot_restore_a_single_point() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(1, 1), Rgba::BLACK, 2);
        store.undo();
        store.redo();
        store.end_stroke();
        assert!(store.strokes().is_empty());
        assert!(store.undone().is_empty());
    }

    #[test]
    fn clear_mid_stroke_drops_the_stroke_in_progress() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(1, 1), Rgba::BLACK, 2);
        store.extend_stroke(Point::new(2, 2));
        store.clear();
        store.extend_stroke(Point::new(3, 3));
        store.end_stroke();
        assert!(store.strokes().is_empty());
        assert!(store.in_progress().is_none());
    }

    #[test]
    fn second_press_finalizes_the_open_stroke() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(0, 0), Rgba::BLACK, 2);
        store.extend_stroke(Point::new(5, 0));
        store.begin_stroke(Point::new(9, 9), Rgba::WHITE, 4);
        store.end_stroke();
        assert_eq!(store.strokes().len(), 1);
        assert_eq!(store.strokes()[0].color(), Rgba::BLACK);
    }

    #[test]
    fn new_stroke_keeps_redo_buffer_by_default() {
        let mut store = StrokeStore::new();
        draw(&mut store, &[(0, 0), (1, 0)], Rgba::BLACK, 2);
        store.undo();
        draw(&mut store, &[(5, 5), (6, 5)], Rgba::BLACK, 2);

        assert_eq!(store.strokes().len(), 1);
        assert_eq!(store.undone().len(), 1);
        store.redo();
        assert_eq!(store.strokes().len(), 2);
    }

    #[test]
    fn clear_on_new_stroke_policy_drops_redo_buffer() {
        let mut store = StrokeStore::with_policy(RedoPolicy::ClearOnNewStroke);
        draw(&mut store, &[(0, 0), (1, 0)], Rgba::BLACK, 2);
        store.undo();
        assert!(store.can_redo());

        draw(&mut store, &[(5, 5), (6, 5)], Rgba::BLACK, 2);
        assert!(!store.can_redo());
    }

    #[test]
    fn every_mutation_marks_dirty() {
        let mut store = StrokeStore::new();
        store.begin_stroke(Point::new(0, 0), Rgba::BLACK, 1);
        assert!(store.take_dirty());
        store.extend_stroke(Point::new(1, 1));
        assert!(store.take_dirty());
        store.end_stroke();
        assert!(store.take_dirty());
        store.undo();
        assert!(store.take_dirty());
        store.redo();
        assert!(store.take_dirty());
        store.clear();
        assert!(store.take_dirty());
        assert!(!store.take_dirty());
    }

    #[test]
    fn strokes_never_appear_in_both_sequences() {
        let mut store = StrokeStore::new();
        for i in 0..4 {
            draw(&mut store, &[(i, 0), (i, 10)], Rgba::BLACK, 1);
        }
        store.undo();
        store.undo();
        store.redo();
        for stroke in store.strokes() {
            assert!(!store.undone().contains(stroke));
        }
        assert_eq!(store.strokes().len() + store.undone().len(), 4);
    }
}
