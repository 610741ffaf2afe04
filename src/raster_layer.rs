//! Freehand raster layer: brush strokes and lasso fills.
//!
//! Independent of part boundaries. Like the region layer, every mutation
//! that starts a new undo step takes a [`Checkpoint`].

use livery_raster::{BlendOp, BrushStyle, RasterBuffer, RasterSnapshot};

use crate::error::EngineError;
use crate::geometry::Point;
use crate::history::Checkpoint;

/// A brush stroke between pointer down and release.
///
/// Style and blend op are fixed at stroke start, so picker changes
/// mid-drag do not affect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveStroke {
    pub style: BrushStyle,
    pub op: BlendOp,
    last: Point,
}

/// Owns the raster buffer and the stroke in progress.
#[derive(Clone)]
pub struct RasterLayer {
    buffer: RasterBuffer,
    stroke: Option<ActiveStroke>,
}

impl RasterLayer {
    pub fn new(width: u32, height: u32, anti_alias: bool) -> Result<Self, EngineError> {
        Ok(Self {
            buffer: RasterBuffer::new(width, height)?.with_anti_alias(anti_alias),
            stroke: None,
        })
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn active_stroke(&self) -> Option<&ActiveStroke> {
        self.stroke.as_ref()
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Start a stroke path at `at`. Pixels change on the first move.
    pub fn begin_stroke(&mut self, at: Point, style: BrushStyle, op: BlendOp, _checkpoint: &Checkpoint) {
        self.stroke = Some(ActiveStroke { style, op, last: at });
        log::debug!("🖌️ Stroke started at ({:.1}, {:.1}) {:?}", at.x, at.y, op);
    }

    /// Extend the active stroke to `to`. Returns false when no stroke is active.
    pub fn extend_stroke(&mut self, to: Point) -> Result<bool, EngineError> {
        let Some(stroke) = self.stroke.as_mut() else {
            return Ok(false);
        };
        self.buffer
            .stroke_segment(stroke.last.into(), to.into(), &stroke.style, stroke.op)?;
        stroke.last = to;
        Ok(true)
    }

    /// Close the active stroke. Returns false when none was active.
    pub fn end_stroke(&mut self) -> bool {
        let ended = self.stroke.take().is_some();
        if ended {
            log::debug!("🖌️ Stroke ended");
        }
        ended
    }

    /// Drop the active stroke without touching the pixels already drawn.
    pub fn abort_stroke(&mut self) {
        if self.stroke.take().is_some() {
            log::debug!("🖌️ Stroke aborted");
        }
    }

    /// Fill a closed lasso polygon: solid color, or alpha clear when erasing.
    pub fn fill_lasso(
        &mut self,
        points: &[Point],
        color: tiny_skia::Color,
        op: BlendOp,
        _checkpoint: &Checkpoint,
    ) -> Result<(), EngineError> {
        let vertices: Vec<(f32, f32)> = points.iter().map(|p| (*p).into()).collect();
        self.buffer.fill_polygon(&vertices, color, op)?;
        log::debug!("➰ Lasso filled with {} points {:?}", points.len(), op);
        Ok(())
    }

    pub fn snapshot(&self) -> RasterSnapshot {
        self.buffer.snapshot()
    }

    pub fn restore(&mut self, snapshot: &RasterSnapshot) -> Result<(), EngineError> {
        self.stroke = None;
        self.buffer.restore(snapshot)?;
        Ok(())
    }
}
