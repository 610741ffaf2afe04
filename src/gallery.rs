//! Part gallery: one card per part with a tinted thumbnail preview.
//!
//! Activating a card goes through the same toggle as a canvas click, but
//! with [`PaintSource::Gallery`], which is exempt from the detected-part lock.

use base64::Engine;
use image::RgbaImage;
use livery_raster::{pixmap_from_rgba, pixmap_to_rgba};
use tiny_skia::{BlendMode, Paint, Rect, Transform};

use crate::color::PaintColor;
use crate::error::EngineError;
use crate::model::{Part, PartId};
use crate::region::{PaintSource, RegionLayer};

/// What the host needs to draw one gallery entry.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub id: PartId,
    /// Label with the provenance marker in front.
    pub label: String,
    /// Assigned paint, if any. Used for the preview tint and the card border.
    pub color: Option<PaintColor>,
    /// True when canvas clicks on this part are rejected.
    pub locked: bool,
    pub area: f32,
}

/// Cards for every part, largest part first.
pub fn gallery_cards(layer: &RegionLayer) -> Vec<GalleryCard> {
    layer
        .parts()
        .gallery_order()
        .into_iter()
        .map(|part| GalleryCard {
            id: part.id.clone(),
            label: part.display_label(),
            color: layer.paint_state().get(part.id.as_str()),
            locked: layer.is_locked(part, PaintSource::Canvas),
            area: part.area,
        })
        .collect()
}

/// Tint a thumbnail with `color` at `opacity`, only where the thumbnail is opaque.
///
/// With no color the thumbnail is returned unchanged.
pub fn tint_thumbnail(
    thumbnail: &RgbaImage,
    color: Option<PaintColor>,
    opacity: f32,
) -> Result<RgbaImage, EngineError> {
    let Some(color) = color else {
        return Ok(thumbnail.clone());
    };

    let mut pixmap = pixmap_from_rgba(thumbnail)?;
    let Some(rect) = Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32) else {
        return Ok(thumbnail.clone());
    };

    let mut paint = Paint::default();
    paint.set_color(color.to_skia(opacity.clamp(0.0, 1.0)));
    paint.blend_mode = BlendMode::SourceAtop;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);

    Ok(pixmap_to_rgba(&pixmap))
}

/// Decode a part's thumbnail and tint it. Parts without a thumbnail give `None`.
pub fn card_preview(
    part: &Part,
    color: Option<PaintColor>,
    opacity: f32,
) -> Result<Option<RgbaImage>, EngineError> {
    let Some(url) = part.thumbnail.as_deref() else {
        return Ok(None);
    };
    let thumbnail = decode_data_url(url)?;
    tint_thumbnail(&thumbnail, color, opacity).map(Some)
}

/// Decode a `data:image/...;base64,...` URL into pixels.
pub fn decode_data_url(url: &str) -> Result<RgbaImage, EngineError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| EngineError::invalid_data_url("missing 'data:' scheme"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| EngineError::invalid_data_url("missing ',' separator"))?;
    if !header.ends_with(";base64") {
        return Err(EngineError::invalid_data_url(format!(
            "unsupported encoding '{}'",
            header
        )));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| EngineError::invalid_data_url(e.to_string()))?;
    let image = image::load_from_memory(&bytes)?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::history::HistoryManager;
    use crate::model::PartSet;
    use livery_raster::RasterBuffer;
    use std::io::Cursor;

    fn png_data_url(image: &RgbaImage) -> String {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    fn part(id: &str, size: f32) -> Part {
        Part::new(
            id,
            "panel",
            vec![Point::new(0.0, 0.0), Point::new(size, 0.0), Point::new(size, size)],
            0.0,
        )
        .expect("part")
    }

    #[test]
    fn test_cards_are_largest_first_with_markers() {
        let parts = PartSet::from_parts(vec![part("yolo_small", 2.0), part("manual_big", 8.0)]).expect("parts");
        let mut layer = RegionLayer::new(parts, true);
        let mut history = HistoryManager::new();
        let raster = RasterBuffer::new(8, 8).expect("raster");
        let cp = history.push(layer.paint_state(), &raster);
        layer
            .set_paint("yolo_small", PaintColor::new(1, 2, 3), &cp)
            .expect("paint");

        let cards = gallery_cards(&layer);
        assert_eq!(cards[0].id.as_str(), "manual_big");
        assert_eq!(cards[0].label, "✏️ panel");
        assert!(!cards[0].locked);
        assert_eq!(cards[1].label, "🔒 panel");
        assert!(cards[1].locked);
        assert_eq!(cards[1].color, Some(PaintColor::new(1, 2, 3)));
    }

    #[test]
    fn test_tint_only_touches_opaque_pixels() {
        let mut thumb = RgbaImage::new(2, 1);
        thumb.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        thumb.put_pixel(1, 0, image::Rgba([0, 0, 0, 0]));

        let tinted = tint_thumbnail(&thumb, Some(PaintColor::new(0, 0, 255)), 1.0).expect("tint");
        assert_eq!(tinted.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(tinted.get_pixel(1, 0).0[3], 0);

        let half = tint_thumbnail(&thumb, Some(PaintColor::new(0, 0, 0)), 0.5).expect("tint");
        let red = half.get_pixel(0, 0).0[0];
        assert!((126..=129).contains(&red), "red was {red}");
    }

    #[test]
    fn test_untinted_preview_is_unchanged() {
        let thumb = RgbaImage::from_pixel(3, 3, image::Rgba([10, 20, 30, 255]));
        assert_eq!(tint_thumbnail(&thumb, None, 0.7).expect("tint"), thumb);
    }

    #[test]
    fn test_decode_data_url() {
        let thumb = RgbaImage::from_pixel(4, 2, image::Rgba([200, 100, 50, 255]));
        let decoded = decode_data_url(&png_data_url(&thumb)).expect("decode");
        assert_eq!(decoded, thumb);

        let with_thumb = part("manual_1", 4.0).with_thumbnail(png_data_url(&thumb));
        let preview = card_preview(&with_thumb, None, 0.7).expect("preview");
        assert_eq!(preview, Some(thumb));
        assert_eq!(card_preview(&part("manual_2", 4.0), None, 0.7).expect("preview"), None);
    }

    #[test]
    fn test_decode_rejects_malformed_urls() {
        for url in ["image/png;base64,AAAA", "data:image/png;base64", "data:text/plain,hello", "data:image/png;base64,!!!"] {
            assert!(
                matches!(decode_data_url(url), Err(EngineError::InvalidDataUrl { .. })),
                "{url} should be rejected"
            );
        }
    }
}
