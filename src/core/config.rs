//! Runtime-tunable render settings.
//!
//! Every knob is named by a [`Tunable`] with a documented valid range; live
//! tuning goes through [`RenderConfig::set`] or [`RenderConfig::apply_patch`]
//! so out-of-range values never reach the shader.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown tunable `{0}`")]
    UnknownTunable(String),
    #[error("value for `{0}` is not a finite number")]
    NotFinite(&'static str),
    #[error("value {value} for `{name}` outside {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tunable {
    BaseDriftSpeed,
    AttractionStrength,
    AttractionFalloff,
    GlowStrength,
    ColorIntensity,
    Threshold,
    ResolutionScale,
    CanvasOpacity,
    FallbackOpacity,
    DprCap,
    TargetFps,
}

impl Tunable {
    pub const ALL: [Tunable; 11] = [
        Tunable::BaseDriftSpeed,
        Tunable::AttractionStrength,
        Tunable::AttractionFalloff,
        Tunable::GlowStrength,
        Tunable::ColorIntensity,
        Tunable::Threshold,
        Tunable::ResolutionScale,
        Tunable::CanvasOpacity,
        Tunable::FallbackOpacity,
        Tunable::DprCap,
        Tunable::TargetFps,
    ];

    /// Name used by page scripts.
    pub fn js_name(self) -> &'static str {
        match self {
            Tunable::BaseDriftSpeed => "baseDriftSpeed",
            Tunable::AttractionStrength => "attractionStrength",
            Tunable::AttractionFalloff => "attractionFalloff",
            Tunable::GlowStrength => "glowStrength",
            Tunable::ColorIntensity => "colorIntensity",
            Tunable::Threshold => "threshold",
            Tunable::ResolutionScale => "resolutionScale",
            Tunable::CanvasOpacity => "canvasOpacity",
            Tunable::FallbackOpacity => "fallbackOpacity",
            Tunable::DprCap => "dprCap",
            Tunable::TargetFps => "targetFps",
        }
    }

    fn snake_name(self) -> &'static str {
        match self {
            Tunable::BaseDriftSpeed => "base_drift_speed",
            Tunable::AttractionStrength => "attraction_strength",
            Tunable::AttractionFalloff => "attraction_falloff",
            Tunable::GlowStrength => "glow_strength",
            Tunable::ColorIntensity => "color_intensity",
            Tunable::Threshold => "threshold",
            Tunable::ResolutionScale => "resolution_scale",
            Tunable::CanvasOpacity => "canvas_opacity",
            Tunable::FallbackOpacity => "fallback_opacity",
            Tunable::DprCap => "dpr_cap",
            Tunable::TargetFps => "target_fps",
        }
    }

    /// Inclusive valid range.
    pub fn range(self) -> (f64, f64) {
        match self {
            Tunable::BaseDriftSpeed => (0.0, 0.01),
            Tunable::AttractionStrength => (0.0, 500.0),
            Tunable::AttractionFalloff => (0.5, 8.0),
            Tunable::GlowStrength => (0.0, 2.0),
            Tunable::ColorIntensity => (0.0, 2.0),
            Tunable::Threshold => (0.0, 1.0),
            Tunable::ResolutionScale => (0.05, 1.0),
            Tunable::CanvasOpacity => (0.0, 1.0),
            Tunable::FallbackOpacity => (0.0, 1.0),
            Tunable::DprCap => (0.5, 4.0),
            Tunable::TargetFps => (1.0, 120.0),
        }
    }

    /// Changing these requires the canvas backing store to be resized.
    pub fn affects_surface_size(self) -> bool {
        matches!(self, Tunable::ResolutionScale | Tunable::DprCap)
    }

    pub fn validate(self, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite(self.js_name()));
        }
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(ConfigError::OutOfRange {
                name: self.js_name(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

impl FromStr for Tunable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tunable::ALL
            .iter()
            .copied()
            .find(|t| t.js_name() == s || t.snake_name() == s)
            .ok_or_else(|| ConfigError::UnknownTunable(s.to_string()))
    }
}

impl fmt::Display for Tunable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.js_name())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub base_drift_speed: f32,
    pub attraction_strength: f32,
    pub attraction_falloff: f32,
    pub glow_strength: f32,
    pub color_intensity: f32,
    pub threshold: f32,
    pub resolution_scale: f32,
    pub canvas_opacity: f32,
    pub fallback_opacity: f32,
    pub dpr_cap: f32,
    pub target_fps: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_drift_speed: 0.0002,
            attraction_strength: 50.0,
            attraction_falloff: 3.9,
            glow_strength: 0.5,
            color_intensity: 0.3,
            threshold: 0.086,
            resolution_scale: 0.35,
            canvas_opacity: 0.5,
            fallback_opacity: 0.26,
            dpr_cap: 2.0,
            target_fps: 30.0,
        }
    }
}

impl RenderConfig {
    pub fn get(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::BaseDriftSpeed => self.base_drift_speed,
            Tunable::AttractionStrength => self.attraction_strength,
            Tunable::AttractionFalloff => self.attraction_falloff,
            Tunable::GlowStrength => self.glow_strength,
            Tunable::ColorIntensity => self.color_intensity,
            Tunable::Threshold => self.threshold,
            Tunable::ResolutionScale => self.resolution_scale,
            Tunable::CanvasOpacity => self.canvas_opacity,
            Tunable::FallbackOpacity => self.fallback_opacity,
            Tunable::DprCap => self.dpr_cap,
            Tunable::TargetFps => self.target_fps,
        }
    }

    fn slot(&mut self, tunable: Tunable) -> &mut f32 {
        match tunable {
            Tunable::BaseDriftSpeed => &mut self.base_drift_speed,
            Tunable::AttractionStrength => &mut self.attraction_strength,
            Tunable::AttractionFalloff => &mut self.attraction_falloff,
            Tunable::GlowStrength => &mut self.glow_strength,
            Tunable::ColorIntensity => &mut self.color_intensity,
            Tunable::Threshold => &mut self.threshold,
            Tunable::ResolutionScale => &mut self.resolution_scale,
            Tunable::CanvasOpacity => &mut self.canvas_opacity,
            Tunable::FallbackOpacity => &mut self.fallback_opacity,
            Tunable::DprCap => &mut self.dpr_cap,
            Tunable::TargetFps => &mut self.target_fps,
        }
    }

    pub fn set(&mut self, tunable: Tunable, value: f64) -> Result<(), ConfigError> {
        tunable.validate(value)?;
        *self.slot(tunable) = value as f32;
        Ok(())
    }

    /// Applies `(name, value)` pairs all-or-nothing: every entry is resolved and
    /// validated before any field changes. Returns the tunables touched.
    pub fn apply_patch<'a, I>(&mut self, entries: I) -> Result<Vec<Tunable>, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut resolved = Vec::new();
        for (name, value) in entries {
            let tunable: Tunable = name.parse()?;
            tunable.validate(value)?;
            resolved.push((tunable, value));
        }
        for (tunable, value) in &resolved {
            *self.slot(*tunable) = *value as f32;
        }
        Ok(resolved.into_iter().map(|(t, _)| t).collect())
    }

    /// Milliseconds between rendered frames at the configured rate.
    #[inline]
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / (self.target_fps.max(1.0) as f64)
    }
}
