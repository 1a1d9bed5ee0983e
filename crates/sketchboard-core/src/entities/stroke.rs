//! Freehand stroke entity.

use super::{EntityId, RgbaColor, new_entity_id};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A freehand stroke: an ordered series of world-space points.
///
/// Points are appended only while the stroke is being captured; once the
/// capturing gesture ends the stroke is never mutated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: EntityId,
    pub(crate) points: Vec<Point>,
    /// Width in world units.
    pub(crate) thickness: f64,
    pub(crate) color: RgbaColor,
}

impl Stroke {
    /// Create a stroke seeded with its first point.
    pub fn new(start: Point, thickness: f64, color: RgbaColor) -> Self {
        Self {
            id: new_entity_id(),
            points: vec![start],
            thickness,
            color,
        }
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, thickness: f64, color: RgbaColor) -> Self {
        Self {
            id: new_entity_id(),
            points,
            thickness,
            color,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn color(&self) -> RgbaColor {
        self.color
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn push_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// True if any recorded point lies strictly within `radius` of `point`.
    pub fn touches(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) < radius)
    }

    /// Bounding box of the recorded points, grown by half the thickness.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let rect = self
            .points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |acc, p| {
                acc.union_pt(*p)
            });
        let half = self.thickness / 2.0;
        rect.inflate(half, half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stroke_has_one_point() {
        let stroke = Stroke::new(Point::new(3.0, 4.0), 2.0, RgbaColor::black());
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.points()[0], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_bounds() {
        let stroke = Stroke::from_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 50.0),
                Point::new(50.0, 100.0),
            ],
            2.0,
            RgbaColor::black(),
        );

        let bounds = stroke.bounds();
        assert!((bounds.x0 + 1.0).abs() < f64::EPSILON);
        assert!((bounds.y0 + 1.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 101.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_touches_uses_strict_radius() {
        let stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
            1.0,
            RgbaColor::black(),
        );
        assert!(stroke.touches(Point::new(10.0, 10.0), 5.0));
        assert!(stroke.touches(Point::new(13.0, 10.0), 5.0));
        assert!(!stroke.touches(Point::new(15.0, 10.0), 5.0));
        // Between the two points but far from both.
        assert!(!stroke.touches(Point::new(5.0, 5.0), 5.0));
    }
}
