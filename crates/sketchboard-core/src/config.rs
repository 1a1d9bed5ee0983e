//! Canvas configuration.

use crate::animation::Duration;
use crate::entities::RgbaColor;
use crate::viewport::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_ZOOM_STEP};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom bounds: min {min} must be positive and not above max {max}")]
    ScaleBounds { min: f64, max: f64 },
    #[error("Invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Damping ratio and frequency of one spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub damping_ratio: f64,
    pub frequency: f64,
}

/// Timing of the animated "center view" transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterAnimation {
    pub duration_ms: u64,
    pub scale: SpringConfig,
    pub offset: SpringConfig,
}

impl Default for CenterAnimation {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            scale: SpringConfig {
                damping_ratio: 0.6,
                frequency: 12.0,
            },
            offset: SpringConfig {
                damping_ratio: 0.7,
                frequency: 10.0,
            },
        }
    }
}

impl CenterAnimation {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Engine configuration. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Zoom factor per wheel notch.
    pub zoom_step: f64,
    /// Pencil width in screen pixels.
    pub pencil_thickness: f64,
    pub pencil_color: RgbaColor,
    /// Eraser radius in screen pixels.
    pub eraser_size: f64,
    /// Font size for new text, in screen pixels.
    pub text_font_size: f64,
    /// Initial editor size for text boxes, in screen pixels.
    pub text_box_size: Size,
    /// Initial editor size for notes, in screen pixels.
    pub note_box_size: Size,
    /// Size of new response cards, in world units.
    pub response_card_size: Size,
    /// Smallest size a card can be resized to.
    pub min_card_size: Size,
    pub center_animation: CenterAnimation,
    /// Initial viewport size in screen pixels.
    pub viewport_size: Size,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            pencil_thickness: 2.0,
            pencil_color: RgbaColor::black(),
            eraser_size: 10.0,
            text_font_size: 16.0,
            text_box_size: Size::new(200.0, 40.0),
            note_box_size: Size::new(200.0, 200.0),
            response_card_size: Size::new(400.0, 300.0),
            min_card_size: Size::new(200.0, 150.0),
            center_animation: CenterAnimation::default(),
            viewport_size: Size::new(1280.0, 800.0),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(ConfigError::ScaleBounds {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        let positive = [
            ("zoom_step", self.zoom_step),
            ("pencil_thickness", self.pencil_thickness),
            ("eraser_size", self.eraser_size),
            ("text_font_size", self.text_font_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid {
                field: "zoom_step",
                value: self.zoom_step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CanvasConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CanvasConfig::from_json(r#"{ "max_scale": 3.0, "eraser_size": 20 }"#).unwrap();
        assert!((config.max_scale - 3.0).abs() < f64::EPSILON);
        assert!((config.eraser_size - 20.0).abs() < f64::EPSILON);
        assert!((config.min_scale - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.center_animation.duration_ms, 500);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = CanvasConfig::from_json(r#"{ "min_scale": 4.0, "max_scale": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ScaleBounds { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = CanvasConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_shrinking_zoom_step() {
        let err = CanvasConfig::from_json(r#"{ "zoom_step": 0.9 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom_step", .. }));
    }
}
