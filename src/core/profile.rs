//! Device performance profile.
//!
//! Derived once at construction from coarse device signals. It only ever
//! lowers the defaults in [`RenderConfig`] and the influence-point capacity.

use crate::core::config::RenderConfig;
use crate::core::constants::{LOW_MEMORY_GIB, MAX_INFLUENCE_POINTS, NARROW_VIEWPORT_PX};

/// Raw signals read from the browser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceSignals {
    pub user_agent: String,
    pub max_touch_points: i32,
    /// `navigator.deviceMemory` in GiB, when the browser exposes it.
    pub device_memory_gib: Option<f64>,
    pub viewport_width: f64,
}

const MOBILE_UA_MARKERS: [&str; 6] = [
    "mobi",
    "android",
    "iphone",
    "ipad",
    "ipod",
    "windows phone",
];

/// Coarse phone/tablet detection: a mobile user agent or a multi-touch screen.
pub fn is_mobile(user_agent: &str, max_touch_points: i32) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    max_touch_points > 1 || MOBILE_UA_MARKERS.iter().any(|m| ua.contains(m))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceProfile {
    pub mobile: bool,
    pub low_memory: bool,
    pub narrow: bool,
    pub dpr_cap: f32,
    pub resolution_scale: f32,
    pub glow_strength_cap: Option<f32>,
    pub color_intensity_cap: Option<f32>,
    pub target_fps: f32,
    pub capacity: usize,
}

impl PerformanceProfile {
    pub fn from_signals(signals: &DeviceSignals) -> Self {
        let defaults = RenderConfig::default();
        let mobile = is_mobile(&signals.user_agent, signals.max_touch_points);
        let low_memory = signals
            .device_memory_gib
            .map(|gib| gib <= LOW_MEMORY_GIB)
            .unwrap_or(false);
        let narrow = signals.viewport_width > 0.0 && signals.viewport_width <= NARROW_VIEWPORT_PX;

        let mut profile = Self {
            mobile,
            low_memory,
            narrow,
            dpr_cap: defaults.dpr_cap,
            resolution_scale: defaults.resolution_scale,
            glow_strength_cap: None,
            color_intensity_cap: None,
            target_fps: defaults.target_fps,
            capacity: MAX_INFLUENCE_POINTS,
        };

        if mobile || narrow {
            profile.dpr_cap = profile.dpr_cap.min(1.5);
            profile.resolution_scale = profile.resolution_scale.min(0.26);
            profile.glow_strength_cap = Some(0.12);
            profile.capacity = profile.capacity.min(6);
        }
        if low_memory {
            profile.dpr_cap = profile.dpr_cap.min(1.3);
            profile.resolution_scale = profile.resolution_scale.min(0.20);
            profile.color_intensity_cap = Some(0.25);
            profile.capacity = profile.capacity.min(5);
        }
        if mobile || low_memory {
            profile.target_fps = profile.target_fps.min(28.0);
        }
        profile
    }

    /// Lowers `config` to this profile's limits; never raises a value.
    pub fn apply(&self, config: &mut RenderConfig) {
        config.dpr_cap = config.dpr_cap.min(self.dpr_cap);
        config.resolution_scale = config.resolution_scale.min(self.resolution_scale);
        if let Some(cap) = self.glow_strength_cap {
            config.glow_strength = config.glow_strength.min(cap);
        }
        if let Some(cap) = self.color_intensity_cap {
            config.color_intensity = config.color_intensity.min(cap);
        }
        config.target_fps = config.target_fps.min(self.target_fps);
    }
}
