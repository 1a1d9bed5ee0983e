//! CPU rasterizer.
//!
//! Paints the scene into an RGBA8 [`Pixmap`] in physical pixels and encodes
//! it as PNG. Used for snapshots handed to the analysis service and for
//! headless hosts.

use crate::grid::{GridBounds, grid_spacing};
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Color;
use sketchboard_core::entities::{NoteEntity, ResponseCard, Stroke, TextEntity};
use sketchboard_core::{GridStyle, Scene, SnapshotExporter};
use std::ops::Range;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.4;
/// Average glyph advance as a multiple of the font size.
const GLYPH_ADVANCE: f64 = 0.55;
/// Inner padding of notes and cards in world units.
const BOX_PADDING: f64 = 8.0;
/// Note accent bar height in screen pixels.
const ACCENT_HEIGHT: f64 = 6.0;

/// Owned RGBA8 image, row-major, not premultiplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Transparent image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let rgba = rgba(color);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Source-over blend of one pixel.
    fn blend(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.index(x, y);
        let alpha = f32::from(rgba[3]) / 255.0;
        let inv_alpha = 1.0 - alpha;
        for channel in 0..3 {
            let dst = f32::from(self.data[idx + channel]);
            self.data[idx + channel] =
                (f32::from(rgba[channel]) * alpha + dst * inv_alpha).round() as u8;
        }
        let dst_alpha = f32::from(self.data[idx + 3]) / 255.0;
        self.data[idx + 3] = ((alpha + dst_alpha * inv_alpha) * 255.0).round() as u8;
    }

    /// Fill the pixels whose centers fall inside `rect`.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rgba = rgba(color);
        let rect = rect.abs();
        let xs = span(rect.x0, rect.x1, self.width);
        for y in span(rect.y0, rect.y1, self.height) {
            for x in xs.clone() {
                self.blend(x, y, rgba);
            }
        }
    }

    /// Draw a border of `width` pixels inside `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, width: f64, color: Color) {
        let rect = rect.abs();
        if rect.width() <= width * 2.0 || rect.height() <= width * 2.0 {
            self.fill_rect(rect, color);
            return;
        }
        self.fill_rect(Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + width), color);
        self.fill_rect(Rect::new(rect.x0, rect.y1 - width, rect.x1, rect.y1), color);
        let (top, bottom) = (rect.y0 + width, rect.y1 - width);
        self.fill_rect(Rect::new(rect.x0, top, rect.x0 + width, bottom), color);
        self.fill_rect(Rect::new(rect.x1 - width, top, rect.x1, bottom), color);
    }

    /// Fill a disc.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let rgba = rgba(color);
        let radius_sq = radius * radius;
        let xs = span(center.x - radius, center.x + radius, self.width);
        for y in span(center.y - radius, center.y + radius, self.height) {
            for x in xs.clone() {
                if (pixel_center(x, y) - center).hypot2() <= radius_sq {
                    self.blend(x, y, rgba);
                }
            }
        }
    }

    /// Stroke a polyline with round caps and joins.
    ///
    /// Coverage is collected into a mask first so overlapping segments of a
    /// translucent stroke are blended only once. A single point draws a dot.
    pub fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Color) {
        let Some(first) = points.first() else {
            return;
        };
        let radius = (width / 2.0).max(0.5);
        let bounds = points
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p))
            .inflate(radius, radius);
        let xs = span(bounds.x0, bounds.x1, self.width);
        let ys = span(bounds.y0, bounds.y1, self.height);
        if xs.is_empty() || ys.is_empty() {
            return;
        }

        let mask_width = (xs.end - xs.start) as usize;
        let mut mask = vec![false; mask_width * (ys.end - ys.start) as usize];
        let radius_sq = radius * radius;
        let segments: Vec<(Point, Point)> = if points.len() == 1 {
            vec![(*first, *first)]
        } else {
            points.windows(2).map(|w| (w[0], w[1])).collect()
        };
        for (a, b) in segments {
            let seg_bounds = Rect::from_points(a, b).inflate(radius, radius);
            let seg_xs = span(seg_bounds.x0.max(bounds.x0), seg_bounds.x1, xs.end);
            let seg_ys = span(seg_bounds.y0.max(bounds.y0), seg_bounds.y1, ys.end);
            for y in seg_ys {
                if y < ys.start {
                    continue;
                }
                for x in seg_xs.clone() {
                    if x < xs.start {
                        continue;
                    }
                    let cell = (y - ys.start) as usize * mask_width + (x - xs.start) as usize;
                    if !mask[cell] && segment_distance_sq(pixel_center(x, y), a, b) <= radius_sq {
                        mask[cell] = true;
                    }
                }
            }
        }

        let rgba = rgba(color);
        for (cell, covered) in mask.iter().enumerate() {
            if *covered {
                let x = xs.start + (cell % mask_width) as u32;
                let y = ys.start + (cell / mask_width) as u32;
                self.blend(x, y, rgba);
            }
        }
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .write_image_data(&self.data)
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer.finish().map_err(|e| RendererError::Encode(e.to_string()))?;
        }
        Ok(png_data)
    }
}

fn rgba(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}

fn pixel_center(x: u32, y: u32) -> Point {
    Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)
}

/// Pixel indices whose centers lie in `[lo, hi)`, clipped to `[0, limit)`.
fn span(lo: f64, hi: f64, limit: u32) -> Range<u32> {
    let start = (lo - 0.5).ceil().max(0.0);
    let end = (hi - 0.5).ceil().min(f64::from(limit));
    if start.is_nan() || end.is_nan() || start >= end {
        return 0..0;
    }
    start as u32..end as u32
}

fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return (p - a).hypot2();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot2()
}

/// Placeholder ink for text content: one bar per line, as long as the line's
/// estimated advance and clipped to `bounds`. Coordinates are world units.
pub fn text_runs(content: &str, bounds: Rect, font_size: f64) -> Vec<Rect> {
    let line_height = font_size * LINE_HEIGHT;
    let mut runs = Vec::new();
    for (row, line) in content.split('\n').enumerate() {
        let top = bounds.y0 + row as f64 * line_height;
        if top + font_size > bounds.y1 {
            break;
        }
        let chars = line.trim_end().chars().count();
        if chars == 0 {
            continue;
        }
        let width = (chars as f64 * font_size * GLYPH_ADVANCE).min(bounds.width());
        runs.push(Rect::new(
            bounds.x0,
            top + font_size * 0.3,
            bounds.x0 + width,
            top + font_size * 0.8,
        ));
    }
    runs
}

/// Renderer that rasterizes on the CPU.
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    pixmap: Pixmap,
    grid_color: Color,
    major_grid_color: Color,
    dot_color: Color,
    ink_color: Color,
    edit_color: Color,
    card_fill: Color,
    card_border: Color,
    handle_color: Color,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self {
            pixmap: Pixmap::new(0, 0),
            grid_color: Color::from_rgba8(200, 200, 200, 100),
            major_grid_color: Color::from_rgba8(170, 170, 170, 150),
            dot_color: Color::from_rgba8(160, 160, 160, 140),
            ink_color: Color::from_rgba8(31, 41, 55, 255),
            edit_color: Color::from_rgba8(59, 130, 246, 255),
            card_fill: Color::from_rgba8(255, 255, 255, 255),
            card_border: Color::from_rgba8(209, 213, 219, 255),
            handle_color: Color::from_rgba8(156, 163, 175, 200),
        }
    }

    /// The most recently built frame.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Build a frame and encode it as PNG.
    pub fn render_png(&mut self, ctx: &RenderContext) -> RenderResult<Vec<u8>> {
        self.render(ctx)?;
        self.pixmap.encode_png()
    }

    /// Build a frame, failing on an unusable output size.
    pub fn render(&mut self, ctx: &RenderContext) -> RenderResult<&Pixmap> {
        let (width, height) = ctx.pixel_size()?;
        if self.pixmap.width() != width || self.pixmap.height() != height {
            self.pixmap = Pixmap::new(width, height);
        }
        let background = self.background_color(ctx);
        self.pixmap.fill(background);

        let transform = ctx.transform();
        self.render_grid(ctx, transform);
        let store = ctx.scene.store;
        for stroke in store.strokes() {
            self.render_stroke(stroke, transform, ctx.pixel_scale());
        }
        for text in store.texts() {
            self.render_text(text, transform, ctx.scale_factor);
        }
        for note in store.notes() {
            self.render_note(note, transform, ctx);
        }
        for card in store.cards().iter().filter(|c| c.is_visible) {
            self.render_card(card, transform, ctx.scale_factor);
        }
        Ok(&self.pixmap)
    }

    fn render_grid(&mut self, ctx: &RenderContext, transform: Affine) {
        let scene = ctx.scene;
        if scene.grid == GridStyle::None {
            return;
        }
        let spacing = grid_spacing(scene.viewport.scale);
        let bounds = GridBounds::new(scene.viewport.visible_world_rect(scene.size), spacing);
        let width = f64::from(self.pixmap.width());
        let height = f64::from(self.pixmap.height());
        let line_width = ctx.scale_factor;

        match scene.grid {
            GridStyle::None => {}
            GridStyle::Lines => {
                for column in bounds.columns() {
                    let x = (transform * Point::new(column.position, 0.0)).x.floor();
                    let color = self.grid_line_color(column.major);
                    self.pixmap.fill_rect(Rect::new(x, 0.0, x + line_width, height), color);
                }
                for row in bounds.rows() {
                    let y = (transform * Point::new(0.0, row.position)).y.floor();
                    let color = self.grid_line_color(row.major);
                    self.pixmap.fill_rect(Rect::new(0.0, y, width, y + line_width), color);
                }
            }
            GridStyle::Dots => {
                let rows: Vec<_> = bounds.rows().collect();
                for column in bounds.columns() {
                    for row in &rows {
                        let center = transform * Point::new(column.position, row.position);
                        let radius = if column.major && row.major { 1.5 } else { 1.0 };
                        self.pixmap.fill_circle(center, radius * ctx.scale_factor, self.dot_color);
                    }
                }
            }
        }
    }

    fn grid_line_color(&self, major: bool) -> Color {
        if major { self.major_grid_color } else { self.grid_color }
    }

    fn render_stroke(&mut self, stroke: &Stroke, transform: Affine, pixel_scale: f64) {
        let points: Vec<Point> = stroke.points().iter().map(|p| transform * *p).collect();
        let width = stroke.thickness() * pixel_scale;
        self.pixmap.stroke_polyline(&points, width, Color::from(stroke.color()));
    }

    fn render_runs(&mut self, content: &str, bounds: Rect, font_size: f64, transform: Affine) {
        for run in text_runs(content, bounds, font_size) {
            self.pixmap.fill_rect(transform.transform_rect_bbox(run), self.ink_color);
        }
    }

    fn render_text(&mut self, text: &TextEntity, transform: Affine, scale_factor: f64) {
        let bounds = Rect::from_origin_size(text.position, text.size);
        self.render_runs(&text.content, bounds, text.style.font_size, transform);
        if text.is_editing {
            self.pixmap
                .stroke_rect(transform.transform_rect_bbox(bounds), scale_factor, self.edit_color);
        }
    }

    fn render_note(&mut self, note: &NoteEntity, transform: Affine, ctx: &RenderContext) {
        let preset = note.preset();
        let bounds = Rect::from_origin_size(note.position, note.size);
        let screen = transform.transform_rect_bbox(bounds);
        self.pixmap.fill_rect(screen, Color::from(preset.background));
        let accent = ACCENT_HEIGHT * ctx.scale_factor;
        self.pixmap.fill_rect(
            Rect::new(screen.x0, screen.y0, screen.x1, screen.y0 + accent),
            Color::from(preset.accent),
        );
        self.pixmap.stroke_rect(screen, ctx.scale_factor, Color::from(preset.border));

        let accent_world = accent / ctx.pixel_scale();
        let body = Rect::new(
            bounds.x0 + BOX_PADDING,
            bounds.y0 + accent_world + BOX_PADDING,
            bounds.x1 - BOX_PADDING,
            bounds.y1 - BOX_PADDING,
        );
        self.render_runs(&note.content, body, note.style.font_size, transform);
        if note.is_editing {
            self.pixmap.stroke_rect(
                screen.inflate(2.0 * ctx.scale_factor, 2.0 * ctx.scale_factor),
                ctx.scale_factor,
                self.edit_color,
            );
        }
    }

    fn render_card(&mut self, card: &ResponseCard, transform: Affine, scale_factor: f64) {
        let bounds = Rect::from_origin_size(card.position, card.size);
        let screen = transform.transform_rect_bbox(bounds);
        self.pixmap.fill_rect(screen, self.card_fill);
        self.pixmap.stroke_rect(screen, scale_factor, self.card_border);

        let body = bounds.inset(-BOX_PADDING);
        self.render_runs(&card.content, body, TextEntity::DEFAULT_FONT_SIZE, transform);

        let handle = ResponseCard::RESIZE_HANDLE * scale_factor;
        let corner = Point::new(screen.x1, screen.y1);
        let handle_rect = Rect::from_points(corner - Vec2::new(handle, handle), corner);
        let handle_color = if card.is_resizing { self.edit_color } else { self.handle_color };
        self.pixmap.fill_rect(handle_rect.inset(-3.0 * scale_factor), handle_color);
    }
}

impl Renderer for RasterRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        if let Err(e) = self.render(ctx) {
            log::warn!("skipping frame: {}", e);
        }
    }
}

impl SnapshotExporter for RasterRenderer {
    type Error = RendererError;

    fn export_png(&mut self, scene: &Scene<'_>) -> RenderResult<Vec<u8>> {
        self.render_png(&RenderContext::new(*scene))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;
    use sketchboard_core::entities::{NoteStyle, TextStyle};
    use sketchboard_core::{Canvas, EntityStore, RgbaColor, Viewport};

    const BACKGROUND: [u8; 4] = [250, 250, 250, 255];

    fn scene<'a>(
        store: &'a EntityStore,
        viewport: &'a Viewport,
        width: f64,
        height: f64,
    ) -> Scene<'a> {
        Scene {
            store,
            viewport,
            size: Size::new(width, height),
            grid: GridStyle::None,
        }
    }

    fn is_background(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        pixmap.pixel(x, y) == Some(BACKGROUND)
    }

    #[test]
    fn test_span_uses_pixel_centers() {
        assert_eq!(span(0.0, 3.0, 10), 0..3);
        assert_eq!(span(0.6, 1.4, 10), 1..1);
        assert_eq!(span(-5.0, 100.0, 10), 0..10);
        assert_eq!(span(f64::NAN, 4.0, 10), 0..0);
    }

    #[test]
    fn test_fill_and_blend() {
        let mut pixmap = Pixmap::new(4, 4);
        pixmap.fill(Color::from_rgba8(255, 255, 255, 255));
        pixmap.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(pixmap.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(2, 2), Some([255, 255, 255, 255]));
        assert_eq!(pixmap.pixel(4, 0), None);

        pixmap.fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), Color::from_rgba8(0, 0, 0, 128));
        let [r, _, _, a] = pixmap.pixel(3, 3).unwrap();
        assert!((126..=128).contains(&r));
        assert_eq!(a, 255);
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut pixmap = Pixmap::new(10, 10);
        pixmap.stroke_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0, Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(pixmap.pixel(0, 5), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(9, 9), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_polyline_coverage() {
        let mut pixmap = Pixmap::new(20, 20);
        let ink = Color::from_rgba8(0, 0, 0, 255);
        pixmap.stroke_polyline(&[Point::new(2.0, 10.0), Point::new(18.0, 10.0)], 4.0, ink);
        assert_eq!(pixmap.pixel(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(10, 8), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(10, 3), Some([0, 0, 0, 0]));
        // Round cap reaches past the end point.
        assert_eq!(pixmap.pixel(19, 10), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_translucent_polyline_blends_once() {
        let mut pixmap = Pixmap::new(20, 20);
        pixmap.fill(Color::from_rgba8(255, 255, 255, 255));
        let ink = Color::from_rgba8(0, 0, 0, 128);
        let points = [Point::new(2.0, 10.0), Point::new(10.0, 10.0), Point::new(2.0, 10.5)];
        pixmap.stroke_polyline(&points, 4.0, ink);
        let [r, ..] = pixmap.pixel(6, 10).unwrap();
        assert!((126..=128).contains(&r));
    }

    #[test]
    fn test_single_point_draws_dot() {
        let mut pixmap = Pixmap::new(10, 10);
        pixmap.stroke_polyline(&[Point::new(5.0, 5.0)], 4.0, Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(pixmap.pixel(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(pixmap.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_text_runs_follow_lines() {
        let runs = text_runs("ab\n\nabcd", Rect::new(0.0, 0.0, 100.0, 100.0), 10.0);
        assert_eq!(runs.len(), 2);
        assert!((runs[0].width() - 11.0).abs() < 1e-9);
        assert!((runs[1].y0 - (28.0 + 3.0)).abs() < 1e-9);

        // Lines that do not fit are dropped and widths are clipped.
        let runs = text_runs("a very long line\nnext", Rect::new(0.0, 0.0, 20.0, 12.0), 10.0);
        assert_eq!(runs.len(), 1);
        assert!((runs[0].width() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_scene_is_background() {
        let store = EntityStore::new();
        let viewport = Viewport::new();
        let mut renderer = RasterRenderer::new();
        let pixmap = renderer
            .render(&RenderContext::new(scene(&store, &viewport, 16.0, 8.0)))
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (16, 8));
        assert!(pixmap.data().chunks_exact(4).all(|px| px == BACKGROUND));
    }

    #[test]
    fn test_stroke_follows_viewport() {
        let mut store = EntityStore::new();
        store.add_stroke(Stroke::from_points(
            vec![Point::new(0.0, 10.0), Point::new(20.0, 10.0)],
            2.0,
            RgbaColor::new(255, 0, 0, 255),
        ));
        let mut viewport = Viewport::new();
        viewport.set_scale(2.0);
        viewport.pan(Vec2::new(10.0, 0.0));

        let mut renderer = RasterRenderer::new();
        let pixmap = renderer
            .render(&RenderContext::new(scene(&store, &viewport, 64.0, 40.0)))
            .unwrap();
        // World (10, 10) lands on screen (30, 20); width is 2 * 2 = 4 pixels.
        assert_eq!(pixmap.pixel(30, 20), Some([255, 0, 0, 255]));
        assert_eq!(pixmap.pixel(30, 21), Some([255, 0, 0, 255]));
        assert!(is_background(pixmap, 30, 24));
        assert!(is_background(pixmap, 5, 20));
    }

    #[test]
    fn test_hidden_cards_are_skipped() {
        let mut store = EntityStore::new();
        let mut card = ResponseCard::new(Point::new(10.0, 10.0), Size::new(40.0, 30.0), "");
        card.is_visible = false;
        store.add_card(card);
        let viewport = Viewport::new();
        let mut renderer = RasterRenderer::new();
        let pixmap = renderer
            .render(&RenderContext::new(scene(&store, &viewport, 64.0, 64.0)))
            .unwrap();
        assert!(pixmap.data().chunks_exact(4).all(|px| px == BACKGROUND));

        let mut store = EntityStore::new();
        store.add_card(ResponseCard::new(Point::new(10.0, 10.0), Size::new(40.0, 30.0), ""));
        let pixmap = renderer
            .render(&RenderContext::new(scene(&store, &viewport, 64.0, 64.0)))
            .unwrap();
        assert_eq!(pixmap.pixel(10, 20), Some([209, 213, 219, 255]));
        assert_eq!(pixmap.pixel(25, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_note_uses_preset_colors() {
        let mut store = EntityStore::new();
        let mut note = NoteEntity::new(
            Point::new(0.0, 0.0),
            Size::new(40.0, 40.0),
            TextStyle::default(),
            "blue-note",
        );
        note.is_editing = false;
        store.add_note(note);
        let viewport = Viewport::new();
        let mut renderer = RasterRenderer::new();
        let pixmap = renderer
            .render(&RenderContext::new(scene(&store, &viewport, 64.0, 64.0)))
            .unwrap();

        let preset = NoteStyle::lookup("blue-note");
        let accent = preset.accent;
        let background = preset.background;
        assert_eq!(pixmap.pixel(20, 3), Some([accent.r, accent.g, accent.b, 255]));
        assert_eq!(pixmap.pixel(20, 30), Some([background.r, background.g, background.b, 255]));
        assert!(is_background(pixmap, 50, 50));
    }

    #[test]
    fn test_grid_lines_at_world_origin() {
        let store = EntityStore::new();
        let mut viewport = Viewport::new();
        viewport.pan(Vec2::new(10.0, 10.0));
        let mut renderer = RasterRenderer::new();
        let ctx =
            RenderContext::new(scene(&store, &viewport, 40.0, 40.0)).with_grid(GridStyle::Lines);
        let pixmap = renderer.render(&ctx).unwrap();
        // The world axes sit at screen x = 10 and y = 10.
        assert!(!is_background(pixmap, 10, 25));
        assert!(!is_background(pixmap, 25, 10));
        assert!(is_background(pixmap, 25, 25));
    }

    #[test]
    fn test_invalid_size_is_an_error() {
        let store = EntityStore::new();
        let viewport = Viewport::new();
        let mut renderer = RasterRenderer::new();
        let result = renderer.render_png(&RenderContext::new(scene(&store, &viewport, 0.0, 10.0)));
        assert!(matches!(result, Err(RendererError::InvalidSize { .. })));
    }

    #[test]
    fn test_png_export() {
        let store = EntityStore::new();
        let viewport = Viewport::new();
        let mut renderer = RasterRenderer::new();
        let ctx = RenderContext::new(scene(&store, &viewport, 12.0, 7.0)).with_scale_factor(2.0);
        let bytes = renderer.render_png(&ctx).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);

        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 24);
        assert_eq!(reader.info().height, 14);
    }

    #[test]
    fn test_canvas_snapshot_through_exporter() {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(Size::new(32.0, 24.0));
        canvas.add_response_card("answer", Point::new(2.0, 2.0));
        let mut renderer = RasterRenderer::new();
        let bytes = canvas.export_snapshot(&mut renderer).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!((renderer.pixmap().width(), renderer.pixmap().height()), (32, 24));
        assert_eq!(renderer.pixmap().pixel(2, 10), Some([209, 213, 219, 255]));
    }
}
