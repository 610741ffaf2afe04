//! Vector region layer: paint assignments for segmented parts.
//!
//! Painting toggles: applying the color a part already has removes it.
//! Every mutator takes a [`Checkpoint`], i.e. the caller has pushed a
//! history entry right before calling it.

use std::collections::HashMap;

use livery_raster::polygon_path;
use tiny_skia::{Color, FillRule, Paint, Pixmap, Stroke, Transform};

use crate::color::PaintColor;
use crate::error::EngineError;
use crate::geometry::Point;
use crate::hit_test::hit_test;
use crate::history::Checkpoint;
use crate::model::{Part, PartId, PartSet, Provenance};

/// Mapping from part id to its assigned color. No entry means unpainted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintState {
    entries: HashMap<PartId, PaintColor>,
}

impl PaintState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<PaintColor> {
        self.entries.get(id).copied()
    }

    pub fn is_painted(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PartId, &PaintColor)> {
        self.entries.iter()
    }

    fn set(&mut self, id: PartId, color: PaintColor) {
        self.entries.insert(id, color);
    }

    fn remove(&mut self, id: &str) -> Option<PaintColor> {
        self.entries.remove(id)
    }
}

/// Where a paint request originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintSource {
    /// Direct click on the part's polygon
    Canvas,
    /// Activation of the part's gallery card
    Gallery,
}

/// Look of the hover affordance and paint outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    /// Opacity of the white fill shown over an unpainted hovered part.
    pub hover_opacity: f32,
    pub anti_alias: bool,
}

/// Visual and interactive state of the server-supplied parts.
#[derive(Debug, Clone, Default)]
pub struct RegionLayer {
    parts: PartSet,
    paint: PaintState,
    lock_detected: bool,
    hover: Option<PartId>,
}

impl RegionLayer {
    pub fn new(parts: PartSet, lock_detected: bool) -> Self {
        Self {
            parts,
            paint: PaintState::new(),
            lock_detected,
            hover: None,
        }
    }

    pub fn parts(&self) -> &PartSet {
        &self.parts
    }

    pub fn paint_state(&self) -> &PaintState {
        &self.paint
    }

    pub fn hover(&self) -> Option<&PartId> {
        self.hover.as_ref()
    }

    pub fn lock_detected(&self) -> bool {
        self.lock_detected
    }

    pub fn set_lock_detected(&mut self, lock: bool) {
        self.lock_detected = lock;
    }

    /// Whether a paint request from `source` may reach this part.
    ///
    /// Detected parts can be locked to gallery-only painting.
    pub fn is_locked(&self, part: &Part, source: PaintSource) -> bool {
        self.lock_detected && source == PaintSource::Canvas && part.provenance() == Provenance::Detected
    }

    /// Topmost part under a logical point.
    pub fn hit(&self, point: Point) -> Option<&Part> {
        hit_test(point, self.parts.by_priority())
    }

    /// Update the hover target. Returns true when it changed.
    pub fn set_hover_at(&mut self, point: Option<Point>) -> bool {
        let target = point.and_then(|p| self.hit(p)).map(|part| part.id.clone());
        if target == self.hover {
            return false;
        }
        self.hover = target;
        true
    }

    pub fn clear_hover(&mut self) -> bool {
        self.hover.take().is_some()
    }

    /// Toggle a part's paint: same color removes it, anything else sets it.
    ///
    /// Returns the part's new entry.
    pub fn toggle_paint(
        &mut self,
        id: &str,
        color: PaintColor,
        _checkpoint: &Checkpoint,
    ) -> Result<Option<PaintColor>, EngineError> {
        let part_id = self.known_id(id)?;
        if self.paint.get(id) == Some(color) {
            self.paint.remove(id);
            log::debug!("🧽 Unpainted {}", id);
            Ok(None)
        } else {
            self.paint.set(part_id, color);
            log::debug!("🎨 Painted {} with {}", id, color);
            Ok(Some(color))
        }
    }

    /// Assign a color unconditionally.
    pub fn set_paint(&mut self, id: &str, color: PaintColor, _checkpoint: &Checkpoint) -> Result<(), EngineError> {
        let part_id = self.known_id(id)?;
        self.paint.set(part_id, color);
        log::debug!("🎨 Painted {} with {}", id, color);
        Ok(())
    }

    /// Remove a part's paint. Returns the color it had.
    pub fn erase(&mut self, id: &str, _checkpoint: &Checkpoint) -> Result<Option<PaintColor>, EngineError> {
        self.known_id(id)?;
        let removed = self.paint.remove(id);
        if removed.is_some() {
            log::debug!("🧽 Erased paint from {}", id);
        }
        Ok(removed)
    }

    /// Put back a paint state taken from history.
    pub fn restore_paint(&mut self, paint: PaintState) {
        self.paint = paint;
    }

    /// Append a part, keeping hit-test priority sorted.
    pub fn insert_part(&mut self, part: Part) -> Result<(), EngineError> {
        self.parts.insert(part)
    }

    /// Replace all parts and drop every paint assignment.
    pub fn reset(&mut self, parts: PartSet) {
        self.parts = parts;
        self.paint = PaintState::new();
        self.hover = None;
    }

    /// Painted parts filled with their colors at full strength.
    ///
    /// Larger parts are drawn first so nested parts stay visible. The
    /// global opacity and blend style are applied when compositing.
    pub fn render_paint(&self, width: u32, height: u32, anti_alias: bool) -> Result<Pixmap, EngineError> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or(livery_raster::RasterError::EmptyBuffer { width, height })?;

        for part in self.parts.gallery_order() {
            let Some(color) = self.paint.get(part.id.as_str()) else {
                continue;
            };
            let path = polygon_path(&part.polygon.to_tuples())?;
            let mut paint = Paint::default();
            paint.anti_alias = anti_alias;
            paint.set_color(color.to_skia(1.0));
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        Ok(pixmap)
    }

    /// Draw outlines of painted parts and the hover highlight on top of `target`.
    ///
    /// Drawn after compositing so it is unaffected by the blend style.
    pub fn render_overlay(&self, target: &mut Pixmap, style: &OverlayStyle) -> Result<(), EngineError> {
        for part in self.parts.gallery_order() {
            let painted = self.paint.is_painted(part.id.as_str());
            let hovered = self.hover.as_ref() == Some(&part.id);
            if !painted && !hovered {
                continue;
            }

            let path = polygon_path(&part.polygon.to_tuples())?;
            let mut paint = Paint::default();
            paint.anti_alias = style.anti_alias;

            if !painted {
                paint.set_color(PaintColor::WHITE.to_skia(style.hover_opacity));
                target.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }

            let (outline, width) = match (painted, part.provenance()) {
                (true, Provenance::Detected) => (Color::from_rgba8(255, 255, 255, 230), 1.0),
                (true, Provenance::Manual) => (Color::from_rgba8(255, 255, 255, 230), 2.0),
                (false, Provenance::Detected) => (Color::from_rgba8(79, 70, 229, 128), 1.0),
                (false, Provenance::Manual) => (Color::from_rgba8(245, 158, 11, 204), 2.0),
            };
            paint.set_color(outline);
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        Ok(())
    }

    fn known_id(&self, id: &str) -> Result<PartId, EngineError> {
        self.parts
            .get(id)
            .map(|part| part.id.clone())
            .ok_or_else(|| EngineError::unknown_part(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryManager;
    use livery_raster::RasterBuffer;

    fn square(id: &str, x0: f32, size: f32) -> Part {
        Part::new(
            id,
            "panel",
            vec![
                Point::new(x0, 0.0),
                Point::new(x0 + size, 0.0),
                Point::new(x0 + size, size),
                Point::new(x0, size),
            ],
            size * size,
        )
        .expect("part")
    }

    fn layer() -> RegionLayer {
        let parts = PartSet::from_parts(vec![square("yolo_1", 0.0, 10.0), square("manual_1", 20.0, 10.0)])
            .expect("parts");
        RegionLayer::new(parts, true)
    }

    fn checkpoint(layer: &RegionLayer, history: &mut HistoryManager) -> Checkpoint {
        let raster = RasterBuffer::new(40, 20).expect("raster");
        history.push(layer.paint_state(), &raster)
    }

    #[test]
    fn test_toggle_law() {
        let mut layer = layer();
        let mut history = HistoryManager::new();
        let red = PaintColor::from_hex("#ff0000").expect("color");

        let cp = checkpoint(&layer, &mut history);
        assert_eq!(layer.toggle_paint("yolo_1", red, &cp).expect("toggle"), Some(red));
        let cp = checkpoint(&layer, &mut history);
        assert_eq!(layer.toggle_paint("yolo_1", red, &cp).expect("toggle"), None);
        assert!(layer.paint_state().is_empty());
    }

    #[test]
    fn test_toggle_with_other_color_replaces() {
        let mut layer = layer();
        let mut history = HistoryManager::new();
        let red = PaintColor::new(255, 0, 0);
        let blue = PaintColor::new(0, 0, 255);

        let cp = checkpoint(&layer, &mut history);
        layer.toggle_paint("manual_1", red, &cp).expect("toggle");
        let cp = checkpoint(&layer, &mut history);
        layer.toggle_paint("manual_1", blue, &cp).expect("toggle");
        assert_eq!(layer.paint_state().get("manual_1"), Some(blue));
    }

    #[test]
    fn test_unknown_part_is_an_error() {
        let mut layer = layer();
        let mut history = HistoryManager::new();
        let cp = checkpoint(&layer, &mut history);
        assert!(matches!(
            layer.toggle_paint("nope", PaintColor::WHITE, &cp),
            Err(EngineError::UnknownPart { .. })
        ));
    }

    #[test]
    fn test_lock_applies_to_detected_canvas_clicks_only() {
        let layer = layer();
        let detected = layer.parts().get("yolo_1").expect("detected");
        let manual = layer.parts().get("manual_1").expect("manual");

        assert!(layer.is_locked(detected, PaintSource::Canvas));
        assert!(!layer.is_locked(detected, PaintSource::Gallery));
        assert!(!layer.is_locked(manual, PaintSource::Canvas));

        let mut unlocked = layer.clone();
        unlocked.set_lock_detected(false);
        let detected = unlocked.parts().get("yolo_1").expect("detected");
        assert!(!unlocked.is_locked(detected, PaintSource::Canvas));
    }

    #[test]
    fn test_hover_never_touches_paint() {
        let mut layer = layer();
        assert!(layer.set_hover_at(Some(Point::new(5.0, 5.0))));
        assert_eq!(layer.hover().map(|id| id.as_str()), Some("yolo_1"));
        assert!(!layer.set_hover_at(Some(Point::new(6.0, 6.0))));
        assert!(layer.set_hover_at(Some(Point::new(15.0, 5.0))));
        assert!(layer.hover().is_none());
        assert!(layer.paint_state().is_empty());
    }

    #[test]
    fn test_render_paint_fills_only_painted_parts() {
        let mut layer = layer();
        let mut history = HistoryManager::new();
        let cp = checkpoint(&layer, &mut history);
        layer
            .set_paint("manual_1", PaintColor::new(0, 255, 0), &cp)
            .expect("paint");

        let pixmap = layer.render_paint(40, 20, true).expect("render");
        let inside = pixmap.pixel(25, 5).expect("pixel");
        assert_eq!((inside.green(), inside.alpha()), (255, 255));
        assert_eq!(pixmap.pixel(5, 5).expect("pixel").alpha(), 0);
    }

    #[test]
    fn test_overlay_highlights_hovered_unpainted_part() {
        let mut layer = layer();
        layer.set_hover_at(Some(Point::new(5.0, 5.0)));
        let mut target = Pixmap::new(40, 20).expect("pixmap");
        let style = OverlayStyle {
            hover_opacity: 0.3,
            anti_alias: true,
        };
        layer.render_overlay(&mut target, &style).expect("overlay");

        let alpha = target.pixel(5, 5).expect("pixel").alpha();
        assert!((70..=80).contains(&alpha), "hover alpha was {alpha}");
        assert_eq!(target.pixel(25, 5).expect("pixel").alpha(), 0);
    }
}
