//! Geometry primitives in logical image space.
//!
//! This module provides:
//! - `Point` for logical pixel coordinates
//! - `Bounds` for axis-aligned extents (e.g. the vehicle's bounding box)
//! - `Polygon` with ray-casting containment and shoelace area

use serde::{Deserialize, Serialize};

/// Minimum number of vertices required for a valid polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A 2D point in logical image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest whole pixel.
    pub fn rounded(&self) -> Point {
        Point::new(self.x.round(), self.y.round())
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Inclusive axis-aligned extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest bounds enclosing every point, or None for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    /// Check if a point lies inside or on the edge.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A polygon defined by an ordered vertex list.
///
/// The last vertex is implicitly connected back to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Check if the polygon has enough vertices to enclose an area.
    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= MIN_POLYGON_VERTICES
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.vertices)
    }

    /// Check if a point is inside the polygon (ray casting algorithm).
    ///
    /// Casts a horizontal ray towards +x and counts edge crossings;
    /// an odd count means inside.
    pub fn contains(&self, point: &Point) -> bool {
        if !self.is_valid() {
            return false;
        }

        let mut inside = false;
        let n = self.vertices.len();

        let mut j = n - 1;
        for i in 0..n {
            let vi = &self.vertices[i];
            let vj = &self.vertices[j];

            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Unsigned area via the shoelace formula.
    pub fn area(&self) -> f32 {
        if !self.is_valid() {
            return 0.0;
        }

        let n = self.vertices.len();
        let twice: f32 = (0..n)
            .map(|i| {
                let a = &self.vertices[i];
                let b = &self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Vertices as plain tuples, for handing to the raster layer.
    pub fn to_tuples(&self) -> Vec<(f32, f32)> {
        self.vertices.iter().map(|p| (*p).into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f32) -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ])
    }

    #[test]
    fn test_polygon_contains() {
        let poly = square(100.0);
        assert!(poly.contains(&Point::new(50.0, 50.0)));
        assert!(!poly.contains(&Point::new(150.0, 50.0)));
        assert!(!poly.contains(&Point::new(50.0, -1.0)));
    }

    #[test]
    fn test_concave_polygon_notch_is_outside() {
        // U shape opening upwards
        let poly = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 40.0),
            Point::new(0.0, 40.0),
        ]);
        assert!(poly.contains(&Point::new(5.0, 10.0)));
        assert!(!poly.contains(&Point::new(15.0, 10.0)));
        assert!(poly.contains(&Point::new(15.0, 35.0)));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert!(!line.is_valid());
        assert!(!line.contains(&Point::new(5.0, 5.0)));
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_shoelace_area() {
        assert!((square(10.0).area() - 100.0).abs() < 0.001);

        let triangle = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(3.0, 0.0),
        ]);
        assert!((triangle.area() - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let bounds = Bounds::new(10.0, 10.0, 20.0, 30.0);
        assert!(bounds.contains(&Point::new(10.0, 30.0)));
        assert!(bounds.contains(&Point::new(15.0, 15.0)));
        assert!(!bounds.contains(&Point::new(9.0, 15.0)));
        assert!(!bounds.contains(&Point::new(15.0, 31.0)));
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = square(8.0).bounds().expect("bounds");
        assert_eq!(bounds, Bounds::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(bounds.width(), 8.0);
        assert!(Bounds::from_points(&[]).is_none());
    }
}
