//! Input events and the state changes they produce.
//!
//! Hosts translate their native pointer events into [`PointerEvent`]s and
//! read back a [`StateDelta`] describing what changed, so they can decide
//! what to redraw.

use crate::color::PaintColor;
use crate::geometry::Point;
use crate::model::PartId;
use crate::segmentation::RequestTicket;
use crate::tools::ToolMode;

/// Kind of pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Button pressed
    Down,
    /// Pointer moved, pressed or not
    Move,
    /// Button released
    Up,
    /// Pointer left the surface
    Leave,
    /// Press and release at one spot
    Click,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }
}

/// Why an input had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Detected part clicked while detected parts are gallery-only
    LockedPart,
    /// Background click outside the detected object's bounds
    OutsideBounds,
    /// No analysis with bounds loaded, so parts cannot be created
    NoBounds,
    /// A region request is already in flight
    Busy,
    /// Lasso finish with fewer than three points
    TooFewLassoPoints,
    /// Segmentation response from an earlier image or request
    StaleResponse,
    /// Segmentation call failed; a notification was raised
    RequestFailed,
    /// Undo with empty history
    NothingToUndo,
}

/// What an input changed.
#[derive(Debug, Clone, PartialEq)]
pub enum StateDelta {
    /// Nothing happened
    None,
    /// The input was deliberately ignored
    Rejected(Rejection),
    /// Hover target changed; only the overlay needs redrawing
    HoverChanged,
    /// A part's paint entry changed; `color` is the new entry
    Painted { id: PartId, color: Option<PaintColor> },
    /// A brush stroke began, optionally clearing a painted part in the same step
    StrokeStarted { erased_part: Option<PartId> },
    StrokeExtended,
    StrokeEnded,
    /// A lasso point was placed, optionally clearing a painted part in the same step
    LassoPointAdded { count: usize, erased_part: Option<PartId> },
    LassoCommitted,
    LassoCancelled,
    /// The host should run segmentation for this ticket
    RegionRequested(RequestTicket),
    /// A new part was appended and painted
    PartAdded { id: PartId },
    Undone,
    ToolChanged(ToolMode),
    EraseToggled(bool),
}

impl StateDelta {
    /// Whether pixels of the composited image may have changed.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, StateDelta::None | StateDelta::Rejected(_) | StateDelta::RegionRequested(_))
    }
}
