//! Renderer trait abstraction.

use kurbo::Affine;
use peniko::Color;
use sketchboard_core::{GridStyle, Scene};
use thiserror::Error;

/// Largest accepted output edge in physical pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Entities, viewport and grid to paint.
    pub scene: Scene<'a>,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Background color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: Scene<'a>) -> Self {
        Self {
            scene,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.scene.grid = style;
        self
    }

    /// World to physical-pixel transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.scene.viewport.transform()
    }

    /// Physical pixels per world unit.
    pub fn pixel_scale(&self) -> f64 {
        self.scale_factor * self.scene.viewport.scale
    }

    /// Output size in physical pixels.
    pub fn pixel_size(&self) -> RenderResult<(u32, u32)> {
        let size = self.scene.size;
        let width = (size.width * self.scale_factor).round();
        let height = (size.height * self.scale_factor).round();
        let limit = f64::from(MAX_DIMENSION);
        if !(width >= 1.0 && height >= 1.0 && width <= limit && height <= limit) {
            return Err(RendererError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }
        Ok((width as u32, height as u32))
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the frame for the given context.
    ///
    /// Called once per frame; prepares every drawing command for the scene.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size, Vec2};
    use sketchboard_core::{EntityStore, Viewport};

    fn scene<'a>(store: &'a EntityStore, viewport: &'a Viewport, size: Size) -> Scene<'a> {
        Scene {
            store,
            viewport,
            size,
            grid: GridStyle::None,
        }
    }

    #[test]
    fn test_pixel_size_applies_scale_factor() {
        let store = EntityStore::new();
        let viewport = Viewport::new();
        let ctx = RenderContext::new(scene(&store, &viewport, Size::new(100.0, 50.0)))
            .with_scale_factor(2.0);
        assert_eq!(ctx.pixel_size().unwrap(), (200, 100));
    }

    #[test]
    fn test_pixel_size_rejects_degenerate() {
        let store = EntityStore::new();
        let viewport = Viewport::new();
        for size in [
            Size::new(0.0, 10.0),
            Size::new(10.0, -1.0),
            Size::new(f64::NAN, 10.0),
            Size::new(100_000.0, 10.0),
        ] {
            let ctx = RenderContext::new(scene(&store, &viewport, size));
            assert!(matches!(ctx.pixel_size(), Err(RendererError::InvalidSize { .. })));
        }
    }

    #[test]
    fn test_transform_includes_viewport() {
        let store = EntityStore::new();
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(10.0, 20.0));
        viewport.set_scale(2.0);
        let ctx = RenderContext::new(scene(&store, &viewport, Size::new(100.0, 100.0)))
            .with_scale_factor(2.0);
        let p = ctx.transform() * Point::new(1.0, 1.0);
        assert!((p.x - (1.0 * 2.0 + 10.0) * 2.0).abs() < 1e-9);
        assert!((p.y - (1.0 * 2.0 + 20.0) * 2.0).abs() < 1e-9);
        assert!((ctx.pixel_scale() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_grid_overrides_scene() {
        let store = EntityStore::new();
        let viewport = Viewport::new();
        let ctx = RenderContext::new(scene(&store, &viewport, Size::new(10.0, 10.0)))
            .with_grid(GridStyle::Dots);
        assert_eq!(ctx.scene.grid, GridStyle::Dots);
    }
}
