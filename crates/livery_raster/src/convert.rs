use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{RasterError, Result};

/// Build a premultiplied pixmap from a straight-alpha RGBA image.
pub fn pixmap_from_rgba(image: &RgbaImage) -> Result<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::EmptyBuffer { width, height })?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Ok(pixmap)
}

/// Convert a premultiplied pixmap back to a straight-alpha RGBA image.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_pixels_survive_conversion() {
        let mut image = RgbaImage::new(4, 3);
        image.put_pixel(1, 2, Rgba([10, 200, 30, 255]));
        image.put_pixel(3, 0, Rgba([255, 255, 255, 255]));

        let pixmap = pixmap_from_rgba(&image).expect("pixmap");
        assert_eq!(pixmap.width(), 4);
        assert_eq!(pixmap.height(), 3);

        let back = pixmap_to_rgba(&pixmap);
        assert_eq!(back.get_pixel(1, 2), &Rgba([10, 200, 30, 255]));
        assert_eq!(back.get_pixel(3, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(back.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_zero_sized_image_is_rejected() {
        let image = RgbaImage::new(0, 5);
        assert!(matches!(
            pixmap_from_rgba(&image),
            Err(RasterError::EmptyBuffer { width: 0, height: 5 })
        ));
    }
}
