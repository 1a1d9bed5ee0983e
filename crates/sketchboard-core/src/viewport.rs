//! Viewport module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Scale that corresponds to "100%" in the UI.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Default lower zoom bound.
pub const DEFAULT_MIN_SCALE: f64 = 0.1;

/// Default upper zoom bound.
pub const DEFAULT_MAX_SCALE: f64 = 5.0;

/// Multiplicative zoom factor applied per wheel notch.
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Viewport manages the view transform for the canvas.
///
/// `offset` is the screen-space position of the world origin and `scale`
/// the number of screen pixels per world unit. Screen and world points are
/// related by `screen = world * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen position of the world origin (pan).
    pub offset: Vec2,
    /// Current zoom level, always within `[min_scale, max_scale]`.
    pub scale: f64,
    /// Minimum allowed zoom level.
    pub min_scale: f64,
    /// Maximum allowed zoom level.
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: DEFAULT_SCALE,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

impl Viewport {
    /// Create a new viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with custom zoom bounds.
    pub fn with_bounds(min_scale: f64, max_scale: f64) -> Self {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        Self {
            offset: Vec2::ZERO,
            scale: DEFAULT_SCALE.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
        }
    }

    /// World-to-screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Convert a screen point to world coordinates.
    pub fn to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.scale,
            (screen_point.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a world point to screen coordinates.
    pub fn to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.scale + self.offset.x,
            world_point.y * self.scale + self.offset.y,
        )
    }

    /// Convert a screen-space length (pixels) to world units.
    pub fn screen_to_world_len(&self, len: f64) -> f64 {
        len / self.scale
    }

    /// Pan the viewport by a delta in screen coordinates. Panning is unbounded.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the world point under `pivot` fixed on screen.
    ///
    /// Returns `false` without touching the offset when the clamped scale
    /// equals the current one.
    pub fn zoom_at(&mut self, pivot: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - old_scale).abs() < f64::EPSILON {
            log::debug!("zoom ignored, scale already at bound {}", old_scale);
            return false;
        }

        let world_under_pivot = self.to_world(pivot);
        self.scale = new_scale;
        self.offset = Vec2::new(
            pivot.x - world_under_pivot.x * new_scale,
            pivot.y - world_under_pivot.y * new_scale,
        );
        true
    }

    /// Zoom one wheel notch at `pivot`. Positive `delta_y` zooms out.
    pub fn zoom_wheel(&mut self, pivot: Point, delta_y: f64, step: f64) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        let factor = if delta_y > 0.0 { 1.0 / step } else { step };
        self.zoom_at(pivot, factor)
    }

    /// Set an absolute scale, anchoring the center of a viewport of `size`.
    pub fn set_scale_centered(&mut self, scale: f64, size: Size) -> bool {
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        self.zoom_at(center, scale / self.scale)
    }

    /// The rectangle of world space visible in a viewport of `size`.
    pub fn visible_world_rect(&self, size: Size) -> Rect {
        let top_left = self.to_world(Point::ZERO);
        let bottom_right = self.to_world(Point::new(size.width, size.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// World-space point at the center of a viewport of `size`.
    pub fn world_center(&self, size: Size) -> Point {
        self.to_world(Point::new(size.width / 2.0, size.height / 2.0))
    }

    /// Set scale directly (used by animations), clamped to bounds.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_viewport() {
        let viewport = Viewport::new();
        assert_eq!(viewport.offset, Vec2::ZERO);
        assert!((viewport.scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_world_with_offset_and_scale() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(50.0, 100.0);
        viewport.scale = 2.0;
        let world = viewport.to_world(Point::new(150.0, 300.0));
        assert_point_eq(world, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(30.0, -20.0);
        viewport.scale = 1.5;

        let original = Point::new(123.0, 456.0);
        let back = viewport.to_screen(viewport.to_world(original));
        assert_point_eq(back, original);
    }

    #[test]
    fn test_transform_matches_to_screen() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(-12.0, 7.5);
        viewport.scale = 3.0;
        let world = Point::new(4.0, -9.0);
        assert_point_eq(viewport.transform() * world, viewport.to_screen(world));
        assert_point_eq(viewport.to_world(viewport.to_screen(world)), world);
    }

    #[test]
    fn test_zoom_keeps_pivot_anchored() {
        let mut viewport = Viewport::new();
        viewport.offset = Vec2::new(17.0, -40.0);
        let pivot = Point::new(320.0, 240.0);

        for factor in [1.1, 1.1, 1.0 / 1.1, 2.5, 0.3] {
            let before = viewport.to_world(pivot);
            viewport.zoom_at(pivot, factor);
            assert_point_eq(viewport.to_world(pivot), before);
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut viewport = Viewport::new();
        viewport.zoom_at(Point::ZERO, 0.001);
        assert!((viewport.scale - viewport.min_scale).abs() < f64::EPSILON);

        viewport.zoom_at(Point::ZERO, 1000.0);
        assert!((viewport.scale - viewport.max_scale).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_sequence_stays_in_bounds() {
        let mut viewport = Viewport::new();
        let pivot = Point::new(10.0, 10.0);
        for i in 0..200 {
            let delta = if i % 7 < 4 { -1.0 } else { 1.0 };
            viewport.zoom_wheel(pivot, delta, DEFAULT_ZOOM_STEP);
            assert!(viewport.scale >= viewport.min_scale);
            assert!(viewport.scale <= viewport.max_scale);
        }
    }

    #[test]
    fn test_zoom_at_bound_is_noop() {
        let mut viewport = Viewport::new();
        viewport.scale = viewport.max_scale;
        viewport.offset = Vec2::new(5.0, 5.0);

        assert!(!viewport.zoom_at(Point::new(100.0, 100.0), 1.1));
        assert_eq!(viewport.offset, Vec2::new(5.0, 5.0));
        assert!((viewport.scale - viewport.max_scale).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_direction() {
        let mut viewport = Viewport::new();
        assert!(viewport.zoom_wheel(Point::ZERO, -1.0, 1.1));
        assert!((viewport.scale - 1.1).abs() < 1e-12);
        assert!(viewport.zoom_wheel(Point::ZERO, 1.0, 1.1));
        assert!((viewport.scale - 1.0).abs() < 1e-12);
        assert!(!viewport.zoom_wheel(Point::ZERO, 0.0, 1.1));
    }

    #[test]
    fn test_pan_is_unbounded() {
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(10.0, 20.0));
        viewport.pan(Vec2::new(-1e9, 1e9));
        assert!((viewport.offset.x - (10.0 - 1e9)).abs() < 1e-3);
        assert!((viewport.offset.y - (20.0 + 1e9)).abs() < 1e-3);
    }

    #[test]
    fn test_set_scale_centered_anchors_center() {
        let mut viewport = Viewport::new();
        let size = Size::new(800.0, 600.0);
        let center_before = viewport.world_center(size);
        assert!(viewport.set_scale_centered(2.0, size));
        assert!((viewport.scale - 2.0).abs() < 1e-12);
        assert_point_eq(viewport.world_center(size), center_before);
    }

    #[test]
    fn test_visible_world_rect() {
        let mut viewport = Viewport::new();
        viewport.scale = 2.0;
        viewport.offset = Vec2::new(100.0, 50.0);
        let rect = viewport.visible_world_rect(Size::new(800.0, 600.0));
        assert!((rect.x0 + 50.0).abs() < 1e-9);
        assert!((rect.y0 + 25.0).abs() < 1e-9);
        assert!((rect.x1 - 350.0).abs() < 1e-9);
        assert!((rect.y1 - 275.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_bounds_orders_limits() {
        let viewport = Viewport::with_bounds(4.0, 0.5);
        assert!((viewport.min_scale - 0.5).abs() < f64::EPSILON);
        assert!((viewport.max_scale - 4.0).abs() < f64::EPSILON);
    }
}
