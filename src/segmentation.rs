//! Segmentation service boundary.
//!
//! The service itself is remote and opaque. This module defines the trait the
//! host implements, the JSON wire format it speaks, and the request tickets
//! used to discard responses that belong to a previous image.

use serde::Deserialize;

use crate::error::EngineError;
use crate::geometry::{Bounds, Point};
use crate::model::Part;

/// Result of analyzing an uploaded photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub width: u32,
    pub height: u32,
    /// Box around every detected part. `None` disables region creation.
    pub bounds: Option<Bounds>,
    /// Displayable photo as a `data:` URL.
    pub original: Option<String>,
    pub parts: Vec<Part>,
}

/// Remote part detection.
///
/// Both calls take the raw uploaded image bytes. Failures are reported as
/// [`EngineError::Segmentation`] and never touch session state.
pub trait SegmentationService {
    /// Detect every part in a photo.
    fn analyze(&self, image: &[u8]) -> Result<Analysis, EngineError>;

    /// Segment the single region under a logical pixel.
    fn segment_at_point(&self, image: &[u8], x: i32, y: i32) -> Result<Part, EngineError>;
}

/// An outstanding region request.
///
/// Carries the session generation it was issued in; a response whose ticket
/// is from an older generation is stale and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub x: i32,
    pub y: i32,
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Reply<T> {
    Failure { error: String },
    Success(T),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(s) => s,
            WireId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

#[derive(Deserialize)]
struct WirePart {
    id: WireId,
    #[serde(default)]
    label: String,
    points: Vec<[f32; 2]>,
    #[serde(default)]
    area: f32,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
struct WireAnalysis {
    width: u32,
    height: u32,
    #[serde(default)]
    bounds: Option<WireBounds>,
    #[serde(default)]
    original: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

impl WirePart {
    fn into_part(self) -> Result<Part, EngineError> {
        let points = self.points.into_iter().map(|[x, y]| Point::new(x, y)).collect();
        let part = Part::new(String::from(self.id), self.label, points, self.area)?;
        Ok(match self.image {
            Some(image) => part.with_thumbnail(image),
            None => part,
        })
    }
}

fn unwrap_reply<T>(reply: Reply<T>) -> Result<T, EngineError> {
    match reply {
        Reply::Success(value) => Ok(value),
        Reply::Failure { error } => Err(EngineError::segmentation(error)),
    }
}

/// Parse an `analyze` response body.
///
/// Parts with fewer than three vertices are skipped with a warning.
pub fn parse_analyze_response(body: &str) -> Result<Analysis, EngineError> {
    let wire = unwrap_reply(serde_json::from_str::<Reply<WireAnalysis>>(body)?)?;

    let mut parts = Vec::with_capacity(wire.parts.len());
    for wire_part in wire.parts {
        match wire_part.into_part() {
            Ok(part) => parts.push(part),
            Err(e) => log::warn!("⚠️ Skipping part: {}", e),
        }
    }

    log::info!(
        "📥 Analysis: {}x{} with {} parts",
        wire.width,
        wire.height,
        parts.len()
    );

    Ok(Analysis {
        width: wire.width,
        height: wire.height,
        bounds: wire
            .bounds
            .map(|b| Bounds::new(b.min_x, b.min_y, b.max_x, b.max_y)),
        original: wire.original,
        parts,
    })
}

/// Parse a `segment_at_point` response body.
pub fn parse_part_response(body: &str) -> Result<Part, EngineError> {
    unwrap_reply(serde_json::from_str::<Reply<WirePart>>(body)?)?.into_part()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;

    const ANALYSIS: &str = r#"{
        "width": 640, "height": 480,
        "bounds": {"minX": 10, "minY": 20, "maxX": 600, "maxY": 400},
        "original": "data:image/png;base64,AAAA",
        "parts": [
            {"id": "yolo_0", "label": "hood", "points": [[10,20],[100,20],[100,80]], "area": 2700, "image": "data:image/png;base64,BBBB"},
            {"id": "yolo_1", "label": "broken", "points": [[1,1],[2,2]], "area": 0},
            {"id": 7, "label": "door", "points": [[0,0],[10,0],[10,10],[0,10]], "area": 0}
        ]
    }"#;

    #[test]
    fn test_parse_analysis() {
        let analysis = parse_analyze_response(ANALYSIS).expect("parse");
        assert_eq!((analysis.width, analysis.height), (640, 480));
        assert_eq!(analysis.bounds, Some(Bounds::new(10.0, 20.0, 600.0, 400.0)));

        assert_eq!(analysis.parts.len(), 2);
        let hood = &analysis.parts[0];
        assert_eq!(hood.provenance(), Provenance::Detected);
        assert_eq!(hood.thumbnail.as_deref(), Some("data:image/png;base64,BBBB"));

        let door = &analysis.parts[1];
        assert_eq!(door.id.as_str(), "7");
        assert_eq!(door.provenance(), Provenance::Manual);
        assert_eq!(door.area, 100.0);
    }

    #[test]
    fn test_error_body_is_segmentation_failure() {
        let body = r#"{"error": "model not loaded"}"#;
        match parse_analyze_response(body) {
            Err(EngineError::Segmentation { message }) => assert_eq!(message, "model not loaded"),
            other => panic!("expected segmentation error, got {other:?}"),
        }
        assert!(matches!(
            parse_part_response(body),
            Err(EngineError::Segmentation { .. })
        ));
    }

    #[test]
    fn test_parse_part() {
        let body = r#"{"id": "manual_3", "label": "mirror", "points": [[1,1],[5,1],[5,5]], "area": 8}"#;
        let part = parse_part_response(body).expect("parse");
        assert_eq!(part.id.as_str(), "manual_3");
        assert!(part.thumbnail.is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_part_response("{"), Err(EngineError::Json(_))));
        assert!(matches!(
            parse_part_response(r#"{"id": "m", "points": [[0,0],[1,1]]}"#),
            Err(EngineError::InvalidPolygon { .. })
        ));
    }
}
