use crate::core::constants::{MAX_DELTA_MULTIPLIER, REFERENCE_FRAME_MS};

/// Decouples the display refresh rate from the render rate.
///
/// Every refresh callback feeds [`FrameClock::tick`]; a frame is only due once
/// enough time has accumulated for the configured interval. The remainder is
/// carried over so the average rate stays on target.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    last_tick_ms: Option<f64>,
    accumulator_ms: f64,
    time: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shader time in reference-frame units. Never decreases.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Forgets the last timestamp so the next tick only primes the clock.
    /// Shader time is kept.
    pub fn reset(&mut self) {
        self.last_tick_ms = None;
        self.accumulator_ms = 0.0;
    }

    /// Feeds one refresh callback. Returns the elapsed milliseconds covered by
    /// the frame when one is due.
    pub fn tick(&mut self, now_ms: f64, frame_interval_ms: f64) -> Option<f64> {
        let last = match self.last_tick_ms.replace(now_ms) {
            Some(last) => last,
            None => return None,
        };
        self.accumulator_ms += (now_ms - last).max(0.0);
        if self.accumulator_ms < frame_interval_ms {
            return None;
        }
        let effective_ms = self.accumulator_ms;
        self.accumulator_ms %= frame_interval_ms.max(f64::EPSILON);
        self.time += effective_ms / REFERENCE_FRAME_MS;
        Some(effective_ms)
    }
}

/// Ratio of `elapsed_ms` to the reference interval, clamped to `[0, 3]`.
#[inline]
pub fn delta_multiplier(elapsed_ms: f64) -> f32 {
    ((elapsed_ms / REFERENCE_FRAME_MS) as f32).clamp(0.0, MAX_DELTA_MULTIPLIER)
}
