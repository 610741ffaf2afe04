//! Point-in-part hit testing.
//!
//! Pure functions shared by click dispatch and hover preview.

use crate::geometry::Point;
use crate::model::Part;

/// Return the first part, in the given priority order, whose polygon contains `point`.
///
/// Callers pass parts already ordered (see [`crate::model::PartSet::by_priority`]);
/// ties between overlapping parts are resolved by that order alone.
pub fn hit_test<'a, I>(point: Point, parts: I) -> Option<&'a Part>
where
    I: IntoIterator<Item = &'a Part>,
{
    parts.into_iter().find(|part| part.contains(&point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartSet;
    use proptest::prelude::*;

    fn rect(id: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Part {
        let points = vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ];
        Part::new(id, "rect", points, 0.0).expect("part")
    }

    fn triangle() -> Part {
        let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(0.0, 100.0)];
        Part::new("yolo_tri", "triangle", points, 0.0).expect("part")
    }

    #[test]
    fn test_nested_part_wins_with_area_priority() {
        let set = PartSet::from_parts(vec![
            rect("yolo_body", 0.0, 0.0, 100.0, 100.0),
            rect("yolo_door", 40.0, 40.0, 60.0, 60.0),
        ])
        .expect("set");

        let hit = hit_test(Point::new(50.0, 50.0), set.by_priority()).expect("hit");
        assert_eq!(hit.id.as_str(), "yolo_door");

        let hit = hit_test(Point::new(10.0, 10.0), set.by_priority()).expect("hit");
        assert_eq!(hit.id.as_str(), "yolo_body");
    }

    #[test]
    fn test_order_decides_ties() {
        let a = rect("a", 0.0, 0.0, 10.0, 10.0);
        let b = rect("b", 0.0, 0.0, 10.0, 10.0);
        assert_eq!(hit_test(Point::new(5.0, 5.0), [&a, &b]).map(|p| p.id.as_str()), Some("a"));
        assert_eq!(hit_test(Point::new(5.0, 5.0), [&b, &a]).map(|p| p.id.as_str()), Some("b"));
    }

    #[test]
    fn test_background_misses() {
        let set = PartSet::from_parts(vec![rect("yolo_0", 0.0, 0.0, 10.0, 10.0)]).expect("set");
        assert!(hit_test(Point::new(50.0, 50.0), set.by_priority()).is_none());
        assert!(hit_test(Point::new(5.0, 5.0), std::iter::empty()).is_none());
    }

    proptest! {
        #[test]
        fn prop_points_strictly_inside_triangle_hit(x in 0.5f32..99.0, y in 0.5f32..99.0) {
            prop_assume!(x + y < 99.5);
            let tri = triangle();
            prop_assert_eq!(hit_test(Point::new(x, y), [&tri]).map(|p| p.id.as_str()), Some("yolo_tri"));
        }

        #[test]
        fn prop_points_strictly_outside_miss(x in -200.0f32..300.0, y in -200.0f32..300.0) {
            let tri = triangle();
            let square = rect("yolo_sq", 150.0, 150.0, 250.0, 250.0);
            let outside_tri = x < -0.5 || y < -0.5 || x + y > 100.5;
            let outside_sq = x < 149.5 || x > 250.5 || y < 149.5 || y > 250.5;
            prop_assume!(outside_tri && outside_sq);
            prop_assert!(hit_test(Point::new(x, y), [&tri, &square]).is_none());
        }
    }
}
