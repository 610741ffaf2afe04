//! Editing session.
//!
//! [`EditorSession`] owns every piece of mutable editor state for one photo:
//! parts and their paint, the raster layer, undo history, the active tool,
//! the lasso draft and the outstanding segmentation request. Hosts feed it
//! pointer and key events and get a [`StateDelta`] back. Nothing here needs
//! a window or a GPU.

mod event;
mod notification;


pub use event::{PointerEvent, PointerKind, Rejection, StateDelta};
pub use notification::{Notification, NotificationLevel, Notifications};

use image::RgbaImage;
use livery_raster::{BlendOp, BrushStyle, RasterBuffer, pixmap_from_rgba, pixmap_to_rgba};
use tiny_skia::Pixmap;

use crate::color::PaintColor;
use crate::compositing::{BlendStyle, CompositingPipeline};
use crate::config::EditorConfig;
use crate::constants::MIN_LASSO_POINTS;
use crate::coords::{ViewportGeometry, to_logical};
use crate::error::EngineError;
use crate::gallery::{GalleryCard, card_preview, decode_data_url, gallery_cards};
use crate::geometry::{Bounds, Point};
use crate::hit_test::hit_test;
use crate::history::{Checkpoint, HistoryManager};
use crate::keybindings::{EditorCommand, KeyBindings, KeyCode, Modifiers};
use crate::model::{Part, PartId, PartSet};
use crate::raster_layer::RasterLayer;
use crate::region::{PaintSource, PaintState, RegionLayer};
use crate::segmentation::{Analysis, RequestTicket, SegmentationService};
use crate::tools::{Cursor, LassoDraft, PointerRoute, ToolMode, ToolState};

/// One photo's worth of editing state.
pub struct EditorSession {
    width: u32,
    height: u32,
    photo: Option<Pixmap>,
    regions: RegionLayer,
    raster: RasterLayer,
    history: HistoryManager,
    tools: ToolState,
    lasso: LassoDraft,
    pipeline: CompositingPipeline,
    color: PaintColor,
    brush_width: f32,
    anti_alias: bool,
    bounds: Option<Bounds>,
    generation: u64,
    pending: Option<RequestTicket>,
    notifications: Notifications,
    keybindings: KeyBindings,
}

impl EditorSession {
    /// Empty session of the given logical size.
    pub fn new(width: u32, height: u32, config: &EditorConfig) -> Result<Self, EngineError> {
        let prefs = &config.preferences;
        Ok(Self {
            width,
            height,
            photo: None,
            regions: RegionLayer::new(PartSet::new(), prefs.lock_detected_parts),
            raster: RasterLayer::new(width, height, prefs.anti_alias)?,
            history: HistoryManager::with_config(prefs.history_config()),
            tools: ToolState::default(),
            lasso: LassoDraft::new(),
            pipeline: CompositingPipeline::new(prefs.composite_settings()),
            color: prefs.default_color,
            brush_width: prefs.brush_width,
            anti_alias: prefs.anti_alias,
            bounds: None,
            generation: 0,
            pending: None,
            notifications: Notifications::new(),
            keybindings: config.keybindings.clone(),
        })
    }

    pub fn from_analysis(analysis: Analysis, config: &EditorConfig) -> Result<Self, EngineError> {
        let mut session = Self::new(analysis.width, analysis.height, config)?;
        session.load_analysis(analysis)?;
        Ok(session)
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Replace everything with a fresh analysis.
    ///
    /// Parts, paint, history, raster pixels, drafts and bounds are all reset,
    /// and the request generation moves on so late responses are dropped.
    /// On error the session is left untouched.
    pub fn load_analysis(&mut self, analysis: Analysis) -> Result<(), EngineError> {
        let (width, height) = (analysis.width, analysis.height);
        let parts = PartSet::from_parts(analysis.parts)?;
        let raster = RasterLayer::new(width, height, self.anti_alias)?;
        let photo = match analysis.original.as_deref() {
            Some(url) => Some(photo_pixmap(&decode_data_url(url)?, width, height)?),
            None => None,
        };

        let part_count = parts.len();
        self.width = width;
        self.height = height;
        self.photo = photo;
        self.regions.reset(parts);
        self.raster = raster;
        self.history.clear();
        self.lasso.clear();
        self.bounds = analysis.bounds;
        self.pending = None;
        self.generation += 1;

        log::info!(
            "🚗 Loaded {}x{} photo with {} parts (generation {})",
            width,
            height,
            part_count,
            self.generation
        );
        Ok(())
    }

    /// Run a full analysis through `service` and load the result.
    ///
    /// Failures become an error notification; the session is unchanged.
    /// Returns true when the new analysis was loaded.
    pub fn analyze_with(&mut self, service: &dyn SegmentationService, image: &[u8]) -> bool {
        let loaded = service
            .analyze(image)
            .and_then(|analysis| self.load_analysis(analysis));
        match loaded {
            Ok(()) => true,
            Err(e) => {
                self.notifications
                    .push(NotificationLevel::Error, format!("Could not analyze photo: {}", e));
                false
            }
        }
    }

    /// Set the photo shown under the paint. Must match the session size.
    pub fn set_photo(&mut self, image: &RgbaImage) -> Result<(), EngineError> {
        self.photo = Some(photo_pixmap(image, self.width, self.height)?);
        Ok(())
    }

    // ========================================================================
    // Picker inputs and policy flags
    // ========================================================================

    pub fn color(&self) -> PaintColor {
        self.color
    }

    /// Takes effect for the next paint; an active stroke keeps its color.
    pub fn set_color(&mut self, color: PaintColor) {
        self.color = color;
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), EngineError> {
        self.color = PaintColor::from_hex(hex)?;
        Ok(())
    }

    pub fn opacity(&self) -> f32 {
        self.pipeline.settings().opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.pipeline.set_opacity(opacity);
    }

    pub fn blend_style(&self) -> BlendStyle {
        self.pipeline.settings().blend
    }

    pub fn set_blend_style(&mut self, blend: BlendStyle) {
        self.pipeline.set_blend(blend);
    }

    pub fn brush_width(&self) -> f32 {
        self.brush_width
    }

    /// Non-positive widths are ignored.
    pub fn set_brush_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.brush_width = width;
        }
    }

    pub fn set_lock_detected(&mut self, lock: bool) {
        self.regions.set_lock_detected(lock);
    }

    // ========================================================================
    // Tools
    // ========================================================================

    pub fn tool_mode(&self) -> ToolMode {
        self.tools.mode()
    }

    pub fn erase_active(&self) -> bool {
        self.tools.erase_active()
    }

    /// Switch tools. Ends any stroke; leaving the lasso drops its draft.
    pub fn set_mode(&mut self, mode: ToolMode) -> StateDelta {
        if !self.tools.set_mode(mode) {
            return StateDelta::None;
        }
        self.raster.end_stroke();
        if mode != ToolMode::Lasso {
            self.lasso.clear();
        }
        StateDelta::ToolChanged(mode)
    }

    pub fn toggle_erase(&mut self) -> StateDelta {
        StateDelta::EraseToggled(self.tools.toggle_erase())
    }

    pub fn set_erase(&mut self, erase: bool) {
        self.tools.set_erase(erase);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Route one pointer event.
    ///
    /// The position is mapped to logical pixels with the geometry measured
    /// for this event.
    pub fn handle_pointer_event(
        &mut self,
        event: PointerEvent,
        geometry: &ViewportGeometry,
    ) -> Result<StateDelta, EngineError> {
        match event.kind {
            PointerKind::Up => return Ok(self.pointer_up()),
            PointerKind::Leave => return Ok(self.pointer_leave()),
            _ => {}
        }

        let Some(point) = to_logical(event.position, geometry) else {
            return Ok(StateDelta::None);
        };

        match event.kind {
            PointerKind::Move => self.pointer_move(point),
            PointerKind::Down => self.pointer_down(point),
            PointerKind::Click => self.click(point),
            PointerKind::Up | PointerKind::Leave => Ok(StateDelta::None),
        }
    }

    /// Route one key press through the keybindings.
    ///
    /// Lasso keys only act in lasso mode, and finishing needs enough points.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: Modifiers) -> Result<StateDelta, EngineError> {
        let Some(command) = self.keybindings.command_for(key, modifiers) else {
            return Ok(StateDelta::None);
        };

        let in_lasso = self.tools.mode() == ToolMode::Lasso;
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::FinishLasso if in_lasso && self.lasso.can_commit() => self.finish_lasso(),
            EditorCommand::CancelLasso if in_lasso => Ok(self.cancel_lasso()),
            EditorCommand::FinishLasso | EditorCommand::CancelLasso => Ok(StateDelta::None),
            EditorCommand::SelectTool(mode) => Ok(self.set_mode(mode)),
            EditorCommand::ToggleErase => Ok(self.toggle_erase()),
        }
    }

    fn pointer_move(&mut self, point: Point) -> Result<StateDelta, EngineError> {
        let hover_changed = self.regions.set_hover_at(Some(point));
        if self.tools.route() == PointerRoute::Raster && self.raster.extend_stroke(point)? {
            return Ok(StateDelta::StrokeExtended);
        }
        Ok(if hover_changed {
            StateDelta::HoverChanged
        } else {
            StateDelta::None
        })
    }

    fn pointer_down(&mut self, point: Point) -> Result<StateDelta, EngineError> {
        if self.tools.mode() != ToolMode::Brush {
            return Ok(StateDelta::None);
        }
        self.raster.abort_stroke();

        let erased_part = if self.tools.erases_regions() {
            self.painted_part_at(point)
        } else {
            None
        };
        let style = self.brush_style();
        let op = self.blend_op();

        let checkpoint = self.checkpoint();
        if let Some(id) = &erased_part {
            self.regions.erase(id.as_str(), &checkpoint)?;
        }
        self.raster.begin_stroke(point, style, op, &checkpoint);
        Ok(StateDelta::StrokeStarted { erased_part })
    }

    fn pointer_up(&mut self) -> StateDelta {
        if self.raster.end_stroke() {
            StateDelta::StrokeEnded
        } else {
            StateDelta::None
        }
    }

    fn pointer_leave(&mut self) -> StateDelta {
        let hover_cleared = self.regions.clear_hover();
        if self.raster.end_stroke() {
            StateDelta::StrokeEnded
        } else if hover_cleared {
            StateDelta::HoverChanged
        } else {
            StateDelta::None
        }
    }

    fn click(&mut self, point: Point) -> Result<StateDelta, EngineError> {
        match self.tools.mode() {
            ToolMode::Select => self.select_click(point),
            ToolMode::Lasso => self.lasso_click(point),
            // brush input arrives as down/move/up
            ToolMode::Brush => Ok(StateDelta::None),
        }
    }

    fn select_click(&mut self, point: Point) -> Result<StateDelta, EngineError> {
        let target = self
            .regions
            .hit(point)
            .map(|part| (part.id.clone(), self.regions.is_locked(part, PaintSource::Canvas)));

        match target {
            None => Ok(self.request_region(point)),
            Some((id, true)) => {
                log::debug!("🔒 {} only accepts paint from the gallery", id);
                Ok(StateDelta::Rejected(Rejection::LockedPart))
            }
            Some((id, false)) => self.toggle(id),
        }
    }

    fn lasso_click(&mut self, point: Point) -> Result<StateDelta, EngineError> {
        let erased_part = if self.tools.erases_regions() {
            self.painted_part_at(point)
        } else {
            None
        };
        if let Some(id) = &erased_part {
            let checkpoint = self.checkpoint();
            self.regions.erase(id.as_str(), &checkpoint)?;
        }

        let count = self.lasso.push(point);
        log::debug!("➰ Lasso point {} at ({:.1}, {:.1})", count, point.x, point.y);
        Ok(StateDelta::LassoPointAdded { count, erased_part })
    }

    // ========================================================================
    // Region painting
    // ========================================================================

    /// Gallery card activation: same toggle as a canvas click, exempt from
    /// the detected-part lock.
    pub fn activate_part(&mut self, id: &str) -> Result<StateDelta, EngineError> {
        let part = self
            .regions
            .parts()
            .get(id)
            .ok_or_else(|| EngineError::unknown_part(id))?;
        if self.regions.is_locked(part, PaintSource::Gallery) {
            return Ok(StateDelta::Rejected(Rejection::LockedPart));
        }
        let id = part.id.clone();
        self.toggle(id)
    }

    fn toggle(&mut self, id: PartId) -> Result<StateDelta, EngineError> {
        let color = self.color;
        let checkpoint = self.checkpoint();
        let color = self.regions.toggle_paint(id.as_str(), color, &checkpoint)?;
        Ok(StateDelta::Painted { id, color })
    }

    /// Topmost painted part under `point`. Unpainted parts are transparent,
    /// so they never shadow the paint beneath them.
    fn painted_part_at(&self, point: Point) -> Option<PartId> {
        let paint = self.regions.paint_state();
        let painted = self
            .regions
            .parts()
            .by_priority()
            .filter(|part| paint.is_painted(part.id.as_str()));
        hit_test(point, painted).map(|part| part.id.clone())
    }

    // ========================================================================
    // Region creation
    // ========================================================================

    fn request_region(&mut self, point: Point) -> StateDelta {
        if self.pending.is_some() {
            log::debug!("⏳ Region request already in flight");
            return StateDelta::Rejected(Rejection::Busy);
        }
        let Some(bounds) = self.bounds else {
            return StateDelta::Rejected(Rejection::NoBounds);
        };

        let target = point.rounded();
        if !bounds.contains(&target) {
            log::debug!("🚫 ({}, {}) is outside the detected bounds", target.x, target.y);
            return StateDelta::Rejected(Rejection::OutsideBounds);
        }

        let ticket = RequestTicket {
            generation: self.generation,
            x: target.x as i32,
            y: target.y as i32,
        };
        self.pending = Some(ticket);
        log::debug!("🔎 Requesting region at ({}, {})", ticket.x, ticket.y);
        StateDelta::RegionRequested(ticket)
    }

    /// Apply the segmentation response for `ticket`.
    ///
    /// Responses for an older generation or an unknown ticket are dropped.
    /// Failures become an error notification. A returned part is appended
    /// and painted with the current color.
    pub fn complete_region_request(
        &mut self,
        ticket: RequestTicket,
        response: Result<Part, EngineError>,
    ) -> Result<StateDelta, EngineError> {
        if ticket.generation != self.generation || self.pending != Some(ticket) {
            log::warn!(
                "⚠️ Dropping stale segmentation response for ({}, {}) from generation {}",
                ticket.x,
                ticket.y,
                ticket.generation
            );
            return Ok(StateDelta::Rejected(Rejection::StaleResponse));
        }
        self.pending = None;

        let part = match response {
            Ok(part) => part,
            Err(e) => {
                self.notifications
                    .push(NotificationLevel::Error, format!("Could not segment region: {}", e));
                return Ok(StateDelta::Rejected(Rejection::RequestFailed));
            }
        };

        let id = part.id.clone();
        if let Err(e) = self.regions.insert_part(part) {
            self.notifications
                .push(NotificationLevel::Error, format!("Could not add region: {}", e));
            return Ok(StateDelta::Rejected(Rejection::RequestFailed));
        }

        let color = self.color;
        let checkpoint = self.checkpoint();
        self.regions.set_paint(id.as_str(), color, &checkpoint)?;
        log::info!("✏️ Added part {}", id);
        Ok(StateDelta::PartAdded { id })
    }

    /// Run `ticket` through a synchronous service and apply the result.
    pub fn create_region_with(
        &mut self,
        ticket: RequestTicket,
        service: &dyn SegmentationService,
        image: &[u8],
    ) -> Result<StateDelta, EngineError> {
        let response = service.segment_at_point(image, ticket.x, ticket.y);
        self.complete_region_request(ticket, response)
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    // ========================================================================
    // Lasso
    // ========================================================================

    /// Close the lasso and fill it, or clear inside it when erasing.
    pub fn finish_lasso(&mut self) -> Result<StateDelta, EngineError> {
        if !self.lasso.can_commit() {
            self.notifications.push(
                NotificationLevel::Warning,
                format!("A lasso needs at least {} points", MIN_LASSO_POINTS),
            );
            return Ok(StateDelta::Rejected(Rejection::TooFewLassoPoints));
        }

        let color = self.color.to_skia(1.0);
        let op = self.blend_op();
        let checkpoint = self.checkpoint();
        let points = self.lasso.take();
        self.raster.fill_lasso(&points, color, op, &checkpoint)?;
        Ok(StateDelta::LassoCommitted)
    }

    /// Discard the lasso draft. Pushes no history.
    pub fn cancel_lasso(&mut self) -> StateDelta {
        if self.lasso.is_empty() {
            return StateDelta::None;
        }
        self.lasso.clear();
        log::debug!("➰ Lasso cancelled");
        StateDelta::LassoCancelled
    }

    pub fn lasso_points(&self) -> &[Point] {
        self.lasso.points()
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Restore the state before the last mutation. Drops drafts and strokes.
    pub fn undo(&mut self) -> Result<StateDelta, EngineError> {
        let Some(entry) = self.history.pop() else {
            return Ok(StateDelta::Rejected(Rejection::NothingToUndo));
        };
        self.raster.restore(&entry.raster)?;
        self.regions.restore_paint(entry.paint_state);
        self.lasso.clear();
        log::debug!("⏪ Undo, {} steps left", self.history.len());
        Ok(StateDelta::Undone)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.history.push(self.regions.paint_state(), self.raster.buffer())
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Composite photo, paint, overlay and lasso preview.
    pub fn render(&self) -> Result<RgbaImage, EngineError> {
        let pixmap = self.pipeline.composite(
            self.photo.as_ref(),
            &self.regions,
            self.raster.buffer(),
            self.lasso.points(),
        )?;
        Ok(pixmap_to_rgba(&pixmap))
    }

    pub fn gallery(&self) -> Vec<GalleryCard> {
        gallery_cards(&self.regions)
    }

    /// Tinted thumbnail for a gallery card at the current opacity.
    pub fn gallery_preview(&self, id: &str) -> Result<Option<RgbaImage>, EngineError> {
        let part = self
            .regions
            .parts()
            .get(id)
            .ok_or_else(|| EngineError::unknown_part(id))?;
        card_preview(part, self.regions.paint_state().get(id), self.opacity())
    }

    pub fn cursor(&self) -> Cursor {
        let hovered = self
            .regions
            .hover()
            .and_then(|id| self.regions.parts().get(id.as_str()));
        self.tools
            .cursor(hovered, self.regions.lock_detected(), self.pending.is_some())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn parts(&self) -> &PartSet {
        self.regions.parts()
    }

    pub fn paint_state(&self) -> &PaintState {
        self.regions.paint_state()
    }

    pub fn hovered_part(&self) -> Option<&PartId> {
        self.regions.hover()
    }

    pub fn raster(&self) -> &RasterBuffer {
        self.raster.buffer()
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        self.notifications.dismiss(id)
    }

    fn brush_style(&self) -> BrushStyle {
        BrushStyle::new(self.brush_width, self.color.to_skia(1.0))
    }

    fn blend_op(&self) -> BlendOp {
        if self.tools.erase_active() {
            BlendOp::EraseAlpha
        } else {
            BlendOp::Replace
        }
    }
}

fn photo_pixmap(image: &RgbaImage, width: u32, height: u32) -> Result<Pixmap, EngineError> {
    if image.dimensions() != (width, height) {
        return Err(EngineError::DimensionMismatch {
            width,
            height,
            found_width: image.width(),
            found_height: image.height(),
        });
    }
    Ok(pixmap_from_rgba(image)?)
}
