use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke,
    Transform,
};

use crate::error::{RasterError, Result};

/// Segments shorter than this are drawn as a single round dab.
const MIN_SEGMENT_LENGTH: f32 = 0.01;

/// How a draw primitive combines with the existing buffer contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendOp {
    /// Draw the color opaque on top of whatever is already there.
    #[default]
    Replace,
    /// Clear alpha inside the footprint, ignoring color.
    EraseAlpha,
}

impl BlendOp {
    fn blend_mode(self) -> BlendMode {
        match self {
            BlendOp::Replace => BlendMode::SourceOver,
            BlendOp::EraseAlpha => BlendMode::Clear,
        }
    }
}

/// Brush parameters captured when a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStyle {
    /// Stroke width in logical pixels.
    pub width: f32,
    /// Paint color. Ignored by [`BlendOp::EraseAlpha`].
    pub color: Color,
}

impl BrushStyle {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// Bit-exact copy of a raster buffer's pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSnapshot {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterSnapshot {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the stored pixel data in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSnapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Freehand paint buffer, same size as the logical image.
///
/// Pixels are stored premultiplied, as `tiny_skia` expects.
#[derive(Clone)]
pub struct RasterBuffer {
    pixmap: Pixmap,
    anti_alias: bool,
}

impl RasterBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::EmptyBuffer { width, height })?;
        Ok(Self {
            pixmap,
            anti_alias: true,
        })
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
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

    /// Alpha of the pixel at (x, y), or None outside the buffer.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }

    /// Straight-alpha RGBA of the pixel at (x, y).
    pub fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// True when no pixel carries any alpha.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Draw one brush segment with round caps and joins.
    ///
    /// Consecutive segments sharing endpoints render as one continuous stroke.
    pub fn stroke_segment(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        style: &BrushStyle,
        op: BlendOp,
    ) -> Result<()> {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        if (dx * dx + dy * dy).sqrt() < MIN_SEGMENT_LENGTH {
            return self.stamp(to, style, op);
        }

        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        let path = pb
            .finish()
            .ok_or_else(|| RasterError::InvalidPath(format!("segment {:?} -> {:?}", from, to)))?;

        let stroke = Stroke {
            width: style.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let paint = self.paint(style.color, op);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        Ok(())
    }

    /// Draw a single round dab the size of the brush.
    pub fn stamp(&mut self, center: (f32, f32), style: &BrushStyle, op: BlendOp) -> Result<()> {
        let radius = style.width / 2.0;
        let path = PathBuilder::from_circle(center.0, center.1, radius).ok_or_else(|| {
            RasterError::InvalidPath(format!("dab at {:?} with radius {}", center, radius))
        })?;
        let paint = self.paint(style.color, op);
        self.fill(&path, &paint);
        Ok(())
    }

    /// Fill a closed polygon. The last vertex connects back to the first.
    pub fn fill_polygon(&mut self, vertices: &[(f32, f32)], color: Color, op: BlendOp) -> Result<()> {
        let path = polygon_path(vertices)?;
        let paint = self.paint(color, op);
        self.fill(&path, &paint);
        Ok(())
    }

    pub fn snapshot(&self) -> RasterSnapshot {
        RasterSnapshot {
            width: self.width(),
            height: self.height(),
            data: self.pixmap.data().to_vec(),
        }
    }

    /// Restore pixels from a snapshot taken on a buffer of the same size.
    pub fn restore(&mut self, snapshot: &RasterSnapshot) -> Result<()> {
        if snapshot.width != self.width() || snapshot.height != self.height() {
            return Err(RasterError::SnapshotMismatch {
                width: self.width(),
                height: self.height(),
                found_width: snapshot.width,
                found_height: snapshot.height,
            });
        }
        self.pixmap.data_mut().copy_from_slice(&snapshot.data);
        Ok(())
    }

    fn paint(&self, color: Color, op: BlendOp) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.anti_alias = self.anti_alias;
        paint.blend_mode = op.blend_mode();
        match op {
            BlendOp::Replace => paint.set_color(color),
            BlendOp::EraseAlpha => paint.set_color(Color::BLACK),
        }
        paint
    }

    fn fill(&mut self, path: &Path, paint: &Paint<'_>) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Build a closed path through the given vertices.
pub fn polygon_path(vertices: &[(f32, f32)]) -> Result<Path> {
    let Some((first, rest)) = vertices.split_first() else {
        return Err(RasterError::InvalidPath("polygon has no vertices".to_string()));
    };

    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for v in rest {
        pb.line_to(v.0, v.1);
    }
    pb.close();
    pb.finish().ok_or_else(|| {
        RasterError::InvalidPath(format!("polygon with {} vertices", vertices.len()))
    })
}
