//! Screen-to-image coordinate mapping.
//!
//! Pointer positions arrive in viewport (screen) space. Everything downstream
//! works in logical image pixels, so every event goes through [`to_logical`]
//! with the geometry measured at the time of that event.

use crate::geometry::Point;

/// On-screen rectangle of the rendered surface, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Geometry needed to map a pointer event into logical image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Bounding box of the surface element itself, after any pan/zoom.
    pub surface: ScreenRect,
    /// Natural width of the image in pixels.
    pub logical_width: u32,
    /// Natural height of the image in pixels.
    pub logical_height: u32,
}

impl ViewportGeometry {
    pub fn new(surface: ScreenRect, logical_width: u32, logical_height: u32) -> Self {
        Self {
            surface,
            logical_width,
            logical_height,
        }
    }

    /// Geometry of a surface laid out at `base` and then wrapped in a pan/zoom transform.
    ///
    /// The resulting rectangle is what the host would measure on the
    /// transformed element, so mapping through it undoes the transform.
    pub fn transformed(base: ScreenRect, transform: &Transform, logical_width: u32, logical_height: u32) -> Self {
        Self::new(transform.apply_to_rect(&base), logical_width, logical_height)
    }

    fn scale(&self) -> Option<(f32, f32)> {
        if self.surface.width <= 0.0 || self.surface.height <= 0.0 {
            return None;
        }
        Some((
            self.logical_width as f32 / self.surface.width,
            self.logical_height as f32 / self.surface.height,
        ))
    }
}

/// Map a screen point to logical image pixels.
///
/// Returns None while the surface has no on-screen area (e.g. not laid out yet).
pub fn to_logical(screen: Point, geometry: &ViewportGeometry) -> Option<Point> {
    let (sx, sy) = geometry.scale()?;
    Some(Point::new(
        (screen.x - geometry.surface.left) * sx,
        (screen.y - geometry.surface.top) * sy,
    ))
}

/// Map a logical image point to screen space. Inverse of [`to_logical`].
pub fn to_screen(logical: Point, geometry: &ViewportGeometry) -> Option<Point> {
    let (sx, sy) = geometry.scale()?;
    Some(Point::new(
        logical.x / sx + geometry.surface.left,
        logical.y / sy + geometry.surface.top,
    ))
}

/// Pan/zoom transform applied around the surface's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Bounding box of `rect` after scaling about its center and panning.
    pub fn apply_to_rect(&self, rect: &ScreenRect) -> ScreenRect {
        let center = rect.center();
        let width = rect.width * self.zoom;
        let height = rect.height * self.zoom;
        ScreenRect::new(
            center.x + self.pan_x - width / 2.0,
            center.y + self.pan_y - height / 2.0,
            width,
            height,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn css_scaled() -> ViewportGeometry {
        // 1024x768 image displayed at half size, offset by a sidebar
        ViewportGeometry::new(ScreenRect::new(250.0, 40.0, 512.0, 384.0), 1024, 768)
    }

    #[test]
    fn test_to_logical_applies_offset_and_scale() {
        let p = to_logical(Point::new(250.0 + 100.0, 40.0 + 50.0), &css_scaled()).expect("mapped");
        assert!(approx_eq(p.x, 200.0));
        assert!(approx_eq(p.y, 100.0));
    }

    #[test]
    fn test_zero_sized_surface_maps_nothing() {
        let geometry = ViewportGeometry::new(ScreenRect::new(0.0, 0.0, 0.0, 100.0), 10, 10);
        assert!(to_logical(Point::new(1.0, 1.0), &geometry).is_none());
    }

    #[test]
    fn test_zoomed_surface_maps_to_same_logical_point() {
        let base = ScreenRect::new(0.0, 0.0, 400.0, 300.0);
        let plain = ViewportGeometry::new(base, 800, 600);
        let zoomed = ViewportGeometry::transformed(base, &Transform::new(2.0, 30.0, -10.0), 800, 600);

        let logical = Point::new(640.0, 120.0);
        let on_plain = to_screen(logical, &plain).expect("plain");
        let on_zoomed = to_screen(logical, &zoomed).expect("zoomed");
        assert_ne!(on_plain, on_zoomed);

        let back = to_logical(on_zoomed, &zoomed).expect("back");
        assert!(approx_eq(back.x, logical.x));
        assert!(approx_eq(back.y, logical.y));
    }

    #[test]
    fn test_identity_transform_keeps_rect() {
        let rect = ScreenRect::new(10.0, 20.0, 300.0, 200.0);
        assert_eq!(Transform::identity().apply_to_rect(&rect), rect);
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_one_pixel(
            lx in 0u32..2000,
            ly in 0u32..2000,
            left in -500.0f32..500.0,
            top in -500.0f32..500.0,
            display_w in 50.0f32..3000.0,
            display_h in 50.0f32..3000.0,
            zoom in 0.2f32..8.0,
            pan_x in -400.0f32..400.0,
            pan_y in -400.0f32..400.0,
        ) {
            let base = ScreenRect::new(left, top, display_w, display_h);
            let geometry = ViewportGeometry::transformed(base, &Transform::new(zoom, pan_x, pan_y), 2000, 2000);
            let logical = Point::new(lx as f32, ly as f32);

            let screen = to_screen(logical, &geometry).expect("screen");
            let back = to_logical(screen, &geometry).expect("logical").rounded();

            prop_assert!((back.x - logical.x).abs() <= 1.0);
            prop_assert!((back.y - logical.y).abs() <= 1.0);
        }
    }
}
