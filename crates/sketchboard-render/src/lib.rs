//! Sketchboard Render Library
//!
//! Renderer abstraction plus a CPU rasterizer that composes the canvas into
//! RGBA pixels and encodes PNG snapshots for the analysis service.

pub mod grid;
mod raster;
mod renderer;

pub use raster::{Pixmap, RasterRenderer, text_runs};
pub use renderer::{MAX_DIMENSION, RenderContext, RenderResult, Renderer, RendererError};
pub use sketchboard_core::GridStyle;
