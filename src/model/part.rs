//! Part types and identifiers.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::geometry::{MIN_POLYGON_VERTICES, Point, Polygon};

/// Id prefix the segmentation service uses for automatically detected parts.
pub const DETECTED_ID_PREFIX: &str = "yolo";

/// Where a part came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Found by the automatic analysis of the whole photo
    Detected,
    /// Created on demand from a user click
    Manual,
}

impl Provenance {
    /// Marker shown in front of the part label in the gallery.
    pub fn marker(&self) -> &'static str {
        match self {
            Provenance::Detected => "🔒",
            Provenance::Manual => "✏️",
        }
    }
}

/// Unique identifier of a part within a session.
///
/// The provenance tag is carried by the id itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn provenance(&self) -> Provenance {
        if self.0.starts_with(DETECTED_ID_PREFIX) {
            Provenance::Detected
        } else {
            Provenance::Manual
        }
    }

    pub fn is_detected(&self) -> bool {
        self.provenance() == Provenance::Detected
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for PartId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A polygonal region of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Unique identifier.
    pub id: PartId,
    /// Human-readable class name (e.g. "hood").
    pub label: String,
    /// Outline in logical image pixels.
    pub polygon: Polygon,
    /// Area in square pixels. Used for hit-test priority.
    pub area: f32,
    /// Cropped thumbnail reference, usually a `data:` URL.
    pub thumbnail: Option<String>,
}

impl Part {
    /// Create a part, validating the outline.
    ///
    /// A non-positive or non-finite `area` is replaced by the polygon's own area.
    pub fn new(
        id: impl Into<PartId>,
        label: impl Into<String>,
        points: Vec<Point>,
        area: f32,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        if points.len() < MIN_POLYGON_VERTICES {
            return Err(EngineError::InvalidPolygon {
                id: id.to_string(),
                vertices: points.len(),
            });
        }

        let polygon = Polygon::new(points);
        let area = if area.is_finite() && area > 0.0 {
            area
        } else {
            polygon.area()
        };

        Ok(Self {
            id,
            label: label.into(),
            polygon,
            area,
            thumbnail: None,
        })
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    pub fn provenance(&self) -> Provenance {
        self.id.provenance()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.polygon.contains(point)
    }

    /// Label with the provenance marker, as shown in the gallery.
    pub fn display_label(&self) -> String {
        format!("{} {}", self.provenance().marker(), self.label)
    }
}
