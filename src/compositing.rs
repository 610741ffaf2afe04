//! Final image assembly.
//!
//! Region paint and raster paint are merged into one paint layer, which is
//! laid over the photo at the global opacity using the selected blend style.
//! Hover affordances and the lasso preview go on top, unblended.

use livery_raster::RasterBuffer;
use serde::{Deserialize, Serialize};
use tiny_skia::{
    BlendMode, Color, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::constants::{DEFAULT_HOVER_OPACITY, DEFAULT_OPACITY};
use crate::error::EngineError;
use crate::geometry::Point;
use crate::region::{OverlayStyle, RegionLayer};

/// How painted color overlays the photograph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendStyle {
    /// Translucent tint: paint multiplies with the photo, so shading and
    /// highlights stay visible even at full opacity.
    Film,
    /// Flat paint over the photo; fully opaque at opacity 1.0.
    #[default]
    Matte,
}

impl BlendStyle {
    pub fn name(&self) -> &'static str {
        match self {
            BlendStyle::Film => "Film",
            BlendStyle::Matte => "Matte",
        }
    }

    fn blend_mode(self) -> BlendMode {
        match self {
            BlendStyle::Film => BlendMode::Multiply,
            BlendStyle::Matte => BlendMode::SourceOver,
        }
    }
}

/// Shared dials that apply to every painted pixel alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeSettings {
    /// Global paint opacity, 0.0-1.0.
    pub opacity: f32,
    pub blend: BlendStyle,
    pub overlay: OverlayStyle,
}

impl Default for CompositeSettings {
    fn default() -> Self {
        Self {
            opacity: DEFAULT_OPACITY,
            blend: BlendStyle::default(),
            overlay: OverlayStyle {
                hover_opacity: DEFAULT_HOVER_OPACITY,
                anti_alias: true,
            },
        }
    }
}

/// Combines photo, region paint and raster paint into the visible image.
#[derive(Debug, Clone, Default)]
pub struct CompositingPipeline {
    settings: CompositeSettings,
}

impl CompositingPipeline {
    pub fn new(settings: CompositeSettings) -> Self {
        let mut pipeline = Self { settings };
        pipeline.set_opacity(settings.opacity);
        pipeline
    }

    pub fn settings(&self) -> &CompositeSettings {
        &self.settings
    }

    /// Set the global opacity, clamped to 0.0-1.0.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.settings.opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            DEFAULT_OPACITY
        };
    }

    pub fn set_blend(&mut self, blend: BlendStyle) {
        self.settings.blend = blend;
    }

    /// Render the visible image.
    ///
    /// Without a photo the paint is composited over transparency.
    pub fn composite(
        &self,
        photo: Option<&Pixmap>,
        regions: &RegionLayer,
        raster: &RasterBuffer,
        lasso: &[Point],
    ) -> Result<Pixmap, EngineError> {
        let (width, height) = (raster.width(), raster.height());
        let mut out = match photo {
            Some(photo) => {
                if (photo.width(), photo.height()) != (width, height) {
                    return Err(EngineError::DimensionMismatch {
                        width,
                        height,
                        found_width: photo.width(),
                        found_height: photo.height(),
                    });
                }
                photo.clone()
            }
            None => Pixmap::new(width, height)
                .ok_or(livery_raster::RasterError::EmptyBuffer { width, height })?,
        };

        let mut paint_layer = regions.render_paint(width, height, self.settings.overlay.anti_alias)?;
        paint_layer.draw_pixmap(
            0,
            0,
            raster.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        let layer_paint = PixmapPaint {
            opacity: self.settings.opacity,
            blend_mode: self.settings.blend.blend_mode(),
            quality: FilterQuality::Nearest,
        };
        out.draw_pixmap(0, 0, paint_layer.as_ref(), &layer_paint, Transform::identity(), None);

        regions.render_overlay(&mut out, &self.settings.overlay)?;
        self.draw_lasso_preview(&mut out, lasso);

        Ok(out)
    }

    fn draw_lasso_preview(&self, target: &mut Pixmap, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.anti_alias = self.settings.overlay.anti_alias;
        paint.set_color(Color::from_rgba8(245, 158, 11, 230));
        let stroke = Stroke {
            width: 1.5,
            ..Stroke::default()
        };
        target.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}
