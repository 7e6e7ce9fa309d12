use crate::core::constants::FOOTPRINT_SCALE;
use glam::Vec2;

/// Element rectangle in CSS pixels, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[inline]
    pub fn has_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Point at fractional offsets `(fx, fy)` inside the rectangle.
    #[inline]
    pub fn point_at(&self, fx: f64, fy: f64) -> (f64, f64) {
        (self.left + self.width * fx, self.top + self.height * fy)
    }
}

/// Inner window size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Maps a CSS pixel position to shader space: x right, y up, both in [0, 1]
    /// for on-screen points.
    #[inline]
    pub fn normalize(&self, px: f64, py: f64) -> Vec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Vec2::new((px / w) as f32, (1.0 - py / h) as f32)
    }

    /// Normalized half extents used for the shader's rectangle mask.
    #[inline]
    pub fn footprint(&self, rect: &Rect) -> Vec2 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Vec2::new(
            (rect.width * FOOTPRINT_SCALE / w) as f32,
            (rect.height * FOOTPRINT_SCALE / h) as f32,
        )
    }
}

/// Canvas backing-store size for a viewport: device pixels capped at
/// `dpr_cap`, then scaled down by `resolution_scale`. Never zero.
pub fn backing_size(
    viewport: Viewport,
    device_pixel_ratio: f64,
    dpr_cap: f64,
    resolution_scale: f64,
) -> (u32, u32) {
    let dpr = if device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(dpr_cap)
    } else {
        1.0_f64.min(dpr_cap)
    };
    let w = (viewport.width * dpr * resolution_scale).floor().max(1.0);
    let h = (viewport.height * dpr * resolution_scale).floor().max(1.0);
    (w as u32, h as u32)
}
