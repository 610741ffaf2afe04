//! Tool modes and the pointer routing they imply.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_LASSO_POINTS;
use crate::geometry::Point;
use crate::model::{Part, Provenance};

/// Editing tools available in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Click parts to toggle their paint, click background to create parts
    #[default]
    Select,
    /// Freehand painting on the raster layer
    Brush,
    /// Click-placed polygon fill on the raster layer
    Lasso,
}

impl ToolMode {
    /// Get the display name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            ToolMode::Select => "Select",
            ToolMode::Brush => "Brush",
            ToolMode::Lasso => "Lasso",
        }
    }

    /// Get all available tools.
    pub fn all() -> &'static [ToolMode] {
        &[ToolMode::Select, ToolMode::Brush, ToolMode::Lasso]
    }

    /// Check if this tool paints on the raster layer.
    pub fn is_raster_tool(&self) -> bool {
        !matches!(self, ToolMode::Select)
    }
}

/// Which layer receives pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRoute {
    /// Hit-test and toggle on the region layer
    Region,
    /// Brush or lasso input on the raster layer
    Raster,
}

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Pointer,
    Crosshair,
    NotAllowed,
    Wait,
}

/// Active tool plus the erase modifier.
///
/// Changes only on explicit user selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolState {
    mode: ToolMode,
    erase_active: bool,
}

impl ToolState {
    pub fn new(mode: ToolMode) -> Self {
        Self {
            mode,
            erase_active: false,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn erase_active(&self) -> bool {
        self.erase_active
    }

    /// Returns true if the mode changed.
    pub fn set_mode(&mut self, mode: ToolMode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::debug!("🛠️ Tool: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        true
    }

    pub fn set_erase(&mut self, erase: bool) {
        self.erase_active = erase;
    }

    pub fn toggle_erase(&mut self) -> bool {
        self.erase_active = !self.erase_active;
        log::debug!("🧽 Erase {}", if self.erase_active { "on" } else { "off" });
        self.erase_active
    }

    pub fn route(&self) -> PointerRoute {
        match self.mode {
            ToolMode::Select => PointerRoute::Region,
            ToolMode::Brush | ToolMode::Lasso => PointerRoute::Raster,
        }
    }

    /// Whether a click on a painted region clears its vector paint.
    pub fn erases_regions(&self) -> bool {
        self.mode.is_raster_tool() && self.erase_active
    }

    /// Cursor for the current mode given what is under the pointer.
    pub fn cursor(&self, hovered: Option<&Part>, locked: bool, busy: bool) -> Cursor {
        if busy {
            return Cursor::Wait;
        }
        match (self.mode, hovered) {
            (ToolMode::Select, Some(part)) if locked && part.provenance() == Provenance::Detected => {
                Cursor::NotAllowed
            }
            (ToolMode::Select, Some(_)) => Cursor::Pointer,
            _ => Cursor::Crosshair,
        }
    }
}

/// Points placed so far in lasso mode. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LassoDraft {
    points: Vec<Point>,
}

impl LassoDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) -> usize {
        self.points.push(point);
        self.points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if enough points exist to close a polygon.
    pub fn can_commit(&self) -> bool {
        self.points.len() >= MIN_LASSO_POINTS
    }

    /// Hand over the points and reset the draft.
    pub fn take(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
