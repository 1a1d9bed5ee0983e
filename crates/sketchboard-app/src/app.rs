//! Headless application shell.
//!
//! Owns the canvas, the input router and a raster renderer, replays a
//! recorded session against them and exports the final frame.

use crate::script::{Action, SessionScript};
use clap::Parser;
use kurbo::Point;
use peniko::Color;
use sketchboard_core::analysis::BoxFuture;
use sketchboard_core::animation::{Duration, Instant};
use sketchboard_core::entities::BoxEntity;
use sketchboard_core::{
    AnalysisRequest, AnalysisResponse, AnalysisResult, AnalysisService, Canvas,
    CanvasConfig, ConfigError, InputRouter, Key, KeyEvent, Modifiers, RgbaColor,
};
use sketchboard_render::{RasterRenderer, RenderContext, RendererError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Simulated frame interval.
const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames spent waiting for animations to settle.
const MAX_SETTLE_FRAMES: u32 = 600;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid session script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Command-line settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketchboard", version)]
#[command(about = "Replay a recorded canvas session and export the final frame as PNG")]
pub struct AppConfig {
    /// Session script to replay
    pub script: PathBuf,

    /// Canvas configuration file; overrides the script's inline config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where the final frame is written
    #[arg(short, long, default_value = "sketchboard.png")]
    pub output: PathBuf,

    /// Device pixel ratio of the exported image
    #[arg(long = "scale", default_value_t = 1.0, value_parser = parse_scale_factor)]
    pub scale_factor: f64,

    /// Background color, as hex or a palette name
    #[arg(long = "background", default_value = "#fafafa", value_parser = parse_color)]
    pub background_color: Color,
}

fn parse_scale_factor(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("not a number: {}", raw))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(format!("must be a positive number: {}", raw));
    }
    Ok(value)
}

fn parse_color(raw: &str) -> Result<Color, String> {
    RgbaColor::parse(raw)
        .map(Color::from)
        .ok_or_else(|| format!("unknown color: {}", raw))
}

/// Summary of a replayed session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub actions: usize,
    pub strokes: usize,
    pub texts: usize,
    pub notes: usize,
    pub cards: usize,
    pub history_len: usize,
    pub failed_analyses: usize,
    pub png_bytes: usize,
}

/// Analysis service that answers with a recorded response body.
struct RecordedService {
    reply: String,
}

impl AnalysisService for RecordedService {
    fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> BoxFuture<'_, AnalysisResult<AnalysisResponse>> {
        Box::pin(async move {
            let payload = request.to_json()?;
            log::debug!("analysis request: {} bytes", payload.len());
            AnalysisResponse::from_json(&self.reply)
        })
    }
}

/// Replay host: canvas, router, renderer and a simulated clock.
pub struct App {
    canvas: Canvas,
    router: InputRouter,
    renderer: RasterRenderer,
    start: Instant,
    elapsed: Duration,
    scale_factor: f64,
    background_color: Color,
    failed_analyses: usize,
}

impl App {
    pub fn new(config: CanvasConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            canvas: Canvas::with_config(config),
            router: InputRouter::new(),
            renderer: RasterRenderer::new(),
            start: Instant::now(),
            elapsed: Duration::ZERO,
            scale_factor: 1.0,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            failed_analyses: 0,
        })
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Current time on the simulated clock.
    pub fn now(&self) -> Instant {
        self.start + self.elapsed
    }

    /// Advance the clock frame by frame, ticking animations.
    fn advance(&mut self, duration: Duration) {
        let mut remaining = duration;
        while !remaining.is_zero() {
            let step = remaining.min(FRAME);
            self.elapsed += step;
            remaining -= step;
            let now = self.now();
            self.canvas.tick(now);
        }
    }

    /// Tick until animations finish.
    pub fn settle(&mut self) {
        let mut frames = 0;
        while self.canvas.is_animating() && frames < MAX_SETTLE_FRAMES {
            self.advance(FRAME);
            frames += 1;
        }
    }

    /// Apply one recorded step, then advance one frame.
    pub fn apply(&mut self, action: &Action) -> AppResult<()> {
        let now = self.now();
        let canvas = &mut self.canvas;
        match action {
            Action::Pointer { event } => {
                self.router.handle_pointer(canvas, *event, now);
            }
            Action::Wheel { event } => {
                self.router.handle_wheel(canvas, *event);
            }
            Action::Key { event } => {
                self.router.handle_key(canvas, event);
            }
            Action::Type { text } => {
                for c in text.chars() {
                    let event = KeyEvent::new(Key::Character(c.to_string()), Modifiers::default());
                    self.router.handle_key(canvas, &event);
                }
            }
            Action::Tool { tool } => canvas.set_tool(*tool),
            Action::Grid { style } => canvas.set_grid_style(*style),
            Action::PencilColor { color } => {
                let parsed = RgbaColor::parse(color)
                    .ok_or_else(|| AppError::InvalidColor(color.clone()))?;
                canvas.set_pencil_color(parsed);
            }
            Action::PencilThickness { size } => canvas.set_pencil_thickness(*size),
            Action::EraserSize { size } => canvas.set_eraser_size(*size),
            Action::NoteStyle { id } => canvas.set_note_style(id),
            Action::FontFamily { family } => canvas.set_font_family(*family),
            Action::Zoom { factor, at } => {
                let size = canvas.viewport_size();
                let pivot = at.unwrap_or_else(|| Point::new(size.width / 2.0, size.height / 2.0));
                canvas.zoom_at(pivot, *factor);
            }
            Action::ZoomTo { scale } => {
                canvas.set_scale_centered(*scale);
            }
            Action::Pan { delta } => canvas.pan(*delta),
            Action::CenterView => canvas.center_view(now),
            Action::ResetCanvas => {
                self.router.cancel(canvas);
                canvas.reset_canvas(now);
            }
            Action::Undo => {
                canvas.undo();
            }
            Action::Redo => {
                canvas.redo();
            }
            Action::AddCard { content, position } => {
                match position {
                    Some(position) => canvas.add_response_card(content.clone(), *position),
                    None => canvas.add_response_card_at_view_center(content.clone()),
                };
            }
            Action::UpdateCard { index, patch } => match canvas.store().cards().get(*index) {
                Some(card) => {
                    let id = card.id();
                    canvas.update_response_card(id, patch.clone());
                }
                None => log::warn!("no card at index {}", index),
            },
            Action::RemoveCard { index } => match canvas.store().cards().get(*index) {
                Some(card) => {
                    let id = card.id();
                    canvas.remove_response_card(id);
                }
                None => log::warn!("no card at index {}", index),
            },
            Action::Analyze { prompt, reply } => {
                let service = RecordedService {
                    reply: reply.to_string(),
                };
                let result = pollster::block_on(canvas.run_analysis(
                    &service,
                    &mut self.renderer,
                    prompt.as_deref(),
                ));
                if let Err(e) = result {
                    log::warn!("analysis failed: {}", e);
                    self.failed_analyses += 1;
                }
            }
            Action::Wait { ms } => {
                self.advance(Duration::from_millis(*ms));
                return Ok(());
            }
            Action::Snapshot { path } => {
                let png = self.render_png()?;
                write_png(path, &png)?;
                log::info!("wrote snapshot {}", path.display());
            }
        }
        self.advance(FRAME);
        Ok(())
    }

    /// Replay a whole session. Gestures still open at the end are torn down.
    pub fn play(&mut self, script: &SessionScript) -> AppResult<Report> {
        if let Some(size) = script.viewport {
            self.canvas.set_viewport_size(size);
        }
        for action in &script.events {
            self.apply(action)?;
        }
        self.router.cancel(&mut self.canvas);
        self.settle();
        Ok(self.report(script.events.len()))
    }

    /// Encode the current frame.
    pub fn render_png(&mut self) -> AppResult<Vec<u8>> {
        let ctx = RenderContext::new(self.canvas.scene())
            .with_scale_factor(self.scale_factor)
            .with_background(self.background_color);
        Ok(self.renderer.render_png(&ctx)?)
    }

    fn report(&self, actions: usize) -> Report {
        let store = self.canvas.store();
        Report {
            actions,
            strokes: store.strokes().len(),
            texts: store.texts().len(),
            notes: store.notes().len(),
            cards: store.cards().len(),
            history_len: self.canvas.history().len(),
            failed_analyses: self.failed_analyses,
            png_bytes: 0,
        }
    }

    /// Load, replay and export according to `config`.
    pub fn run(config: &AppConfig) -> AppResult<Report> {
        let script = SessionScript::from_json(&std::fs::read_to_string(&config.script)?)?;
        let canvas_config = match &config.config {
            Some(path) => CanvasConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => script.config.clone().unwrap_or_default(),
        };

        let mut app = App::new(canvas_config)?
            .with_scale_factor(config.scale_factor)
            .with_background(config.background_color);
        let mut report = app.play(&script)?;
        let png = app.render_png()?;
        write_png(&config.output, &png)?;
        report.png_bytes = png.len();
        log::info!(
            "replayed {} actions: {} strokes, {} texts, {} notes, {} cards -> {}",
            report.actions,
            report.strokes,
            report.texts,
            report.notes,
            report.cards,
            config.output.display()
        );
        Ok(report)
    }
}

fn write_png(path: &Path, png: &[u8]) -> AppResult<()> {
    std::fs::write(path, png)?;
    Ok(())
}
