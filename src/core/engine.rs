//! The background effect state machine.
//!
//! `AuroraEngine` owns the influence points, the frame clock and the render
//! configuration, and drives a [`Backend`] that does the actual browser work
//! (surface lookup, WebGL, frame callbacks). Every failure is logged and
//! absorbed here; nothing is ever raised to the page.

use crate::core::clock::{delta_multiplier, FrameClock};
use crate::core::config::{ConfigError, RenderConfig, Tunable};
use crate::core::constants::REFERENCE_FRAME_MS;
use crate::core::error::AuroraError;
use crate::core::geometry::{Rect, Viewport};
use crate::core::influence::{InfluenceSet, PointUniforms};
use crate::core::profile::{DeviceSignals, PerformanceProfile};
use std::fmt;

/// Browser-facing operations the engine needs. The wasm build implements this
/// on top of `web-sys`; tests use an in-memory recorder.
pub trait Backend {
    type Element: Clone + PartialEq;
    type FrameHandle: Copy + fmt::Debug;

    fn prefers_reduced_motion(&self) -> bool;
    fn page_visible(&self) -> bool;
    fn viewport(&self) -> Viewport;

    /// Finds the drawing surface and applies its fixed styling.
    fn locate_surface(&mut self, config: &RenderConfig) -> Result<(), AuroraError>;
    fn ensure_glass_layer(&mut self);
    fn acquire_context(&mut self) -> Result<(), AuroraError>;
    fn upload_quad(&mut self) -> Result<(), AuroraError>;
    fn build_program(&mut self) -> Result<(), AuroraError>;
    fn has_program(&self) -> bool;
    /// Deletes the program through the live context.
    fn release_program(&mut self);
    /// Drops program handles without touching the (lost) context.
    fn discard_program(&mut self);
    fn resize(&mut self, config: &RenderConfig);

    fn apply_static_fallback(&mut self, config: &RenderConfig);
    fn set_canvas_opacity(&mut self, opacity: f32);
    fn set_container_opacity(&mut self, opacity: f32);

    fn query_elements(&self) -> Vec<(Self::Element, Rect)>;
    fn element_rect(&self, element: &Self::Element) -> Option<Rect>;

    fn request_frame(&mut self) -> Option<Self::FrameHandle>;
    fn cancel_frame(&mut self, handle: Self::FrameHandle);
    /// Drops the frame callback for good; no frame can be requested afterwards.
    fn release_frames(&mut self);

    fn draw(&mut self, frame: &FrameInputs<'_>);
}

/// Per-frame shader inputs.
pub struct FrameInputs<'a> {
    pub time: f32,
    pub config: &'a RenderConfig,
    pub points: &'a PointUniforms,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    /// Reduced motion: a static gradient replaces rendering.
    Static,
    Running,
    Paused,
    Destroyed,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Static => "static",
            EngineState::Running => "running",
            EngineState::Paused => "paused",
            EngineState::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AuroraEngine<B: Backend> {
    backend: B,
    config: RenderConfig,
    profile: PerformanceProfile,
    points: InfluenceSet<B::Element>,
    uniforms: PointUniforms,
    clock: FrameClock,
    state: EngineState,
    pending: Option<B::FrameHandle>,
    reduced_motion: bool,
    init_attempted: bool,
    context_lost: bool,
    last_error: Option<AuroraError>,
}

impl<B: Backend> AuroraEngine<B> {
    pub fn new(backend: B, signals: &DeviceSignals) -> Self {
        let profile = PerformanceProfile::from_signals(signals);
        let mut config = RenderConfig::default();
        profile.apply(&mut config);
        log::info!(
            "[aurora] profile mobile={} low_memory={} narrow={} capacity={} fps={}",
            profile.mobile,
            profile.low_memory,
            profile.narrow,
            profile.capacity,
            profile.target_fps
        );
        Self {
            backend,
            config,
            profile,
            points: InfluenceSet::new(profile.capacity),
            uniforms: PointUniforms::default(),
            clock: FrameClock::new(),
            state: EngineState::Uninitialized,
            pending: None,
            reduced_motion: false,
            init_attempted: false,
            context_lost: false,
            last_error: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn profile(&self) -> &PerformanceProfile {
        &self.profile
    }

    pub fn points(&self) -> &InfluenceSet<B::Element> {
        &self.points
    }

    pub fn uniforms(&self) -> &PointUniforms {
        &self.uniforms
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&AuroraError> {
        self.last_error.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// One-shot setup. A failed attempt is final for this instance.
    pub fn init(&mut self) {
        if self.init_attempted || self.state == EngineState::Destroyed {
            return;
        }
        self.init_attempted = true;

        self.reduced_motion = self.backend.prefers_reduced_motion();
        if self.reduced_motion {
            self.backend.ensure_glass_layer();
            self.backend.apply_static_fallback(&self.config);
            self.state = EngineState::Static;
            log::info!("[aurora] reduced motion preferred, using static background");
            return;
        }

        if let Err(e) = self.backend.locate_surface(&self.config) {
            self.fail(e);
            return;
        }
        self.backend.ensure_glass_layer();
        if let Err(e) = self.setup_pipeline() {
            self.fail(e);
            return;
        }

        let elements = self.backend.query_elements();
        let candidates = self
            .points
            .register_permanent(&elements, self.backend.viewport());
        log::info!(
            "[aurora] registered {}/{} permanent influence points",
            self.points.len(),
            candidates
        );

        self.clock.reset();
        self.render(REFERENCE_FRAME_MS);
        self.state = EngineState::Running;
        self.schedule();
        if !self.backend.page_visible() {
            self.pause();
        }
        self.backend.set_container_opacity(self.config.fallback_opacity);
        log::info!("[aurora] initialized");
    }

    fn setup_pipeline(&mut self) -> Result<(), AuroraError> {
        self.backend.acquire_context()?;
        self.backend.resize(&self.config);
        self.backend.upload_quad()?;
        self.backend.build_program()?;
        Ok(())
    }

    fn fail(&mut self, error: AuroraError) {
        log::error!("[aurora] {}", error);
        self.last_error = Some(error);
    }

    fn schedule(&mut self) {
        if self.pending.is_none() {
            self.pending = self.backend.request_frame();
        }
    }

    fn unschedule(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.backend.cancel_frame(handle);
        }
    }

    /// Page hidden, blurred or navigated away from.
    pub fn pause(&mut self) {
        match self.state {
            EngineState::Running | EngineState::Paused => {
                self.unschedule();
                self.clock.reset();
                self.state = EngineState::Paused;
            }
            _ => {}
        }
    }

    /// Page visible or focused again.
    pub fn resume(&mut self) {
        if self.state != EngineState::Paused || self.reduced_motion {
            return;
        }
        if !self.backend.page_visible() {
            return;
        }
        self.clock.reset();
        self.state = EngineState::Running;
        self.schedule();
    }

    pub fn destroy(&mut self) {
        if self.state == EngineState::Destroyed {
            return;
        }
        self.unschedule();
        self.backend.release_program();
        self.backend.release_frames();
        self.state = EngineState::Destroyed;
        log::info!("[aurora] destroyed");
    }

    /// Display refresh callback. Reschedules first, then renders only when the
    /// configured frame interval has elapsed.
    pub fn on_frame(&mut self, now_ms: f64) {
        if self.state != EngineState::Running {
            return;
        }
        // the handle that just fired is spent
        self.pending = None;
        self.schedule();
        if let Some(elapsed_ms) = self.clock.tick(now_ms, self.config.frame_interval_ms()) {
            self.render(elapsed_ms);
        }
    }

    fn render(&mut self, elapsed_ms: f64) {
        if !self.backend.has_program() {
            return;
        }
        let viewport = self.backend.viewport();
        let backend = &self.backend;
        self.points
            .update(delta_multiplier(elapsed_ms), viewport, |el| backend.element_rect(el));
        self.points.pack(&mut self.uniforms);
        self.backend.draw(&FrameInputs {
            time: self.clock.time() as f32,
            config: &self.config,
            points: &self.uniforms,
        });
    }

    pub fn on_context_lost(&mut self) {
        // only a running surface can be lost; setup failures stay final
        if !matches!(self.state, EngineState::Running | EngineState::Paused) {
            return;
        }
        self.unschedule();
        self.backend.discard_program();
        self.clock.reset();
        self.state = EngineState::Uninitialized;
        self.context_lost = true;
        log::warn!("[aurora] {}", AuroraError::ContextLost);
        self.last_error = Some(AuroraError::ContextLost);
    }

    pub fn on_context_restored(&mut self) {
        if !self.context_lost || self.state == EngineState::Destroyed {
            return;
        }
        if let Err(e) = self.setup_pipeline() {
            self.fail(e);
            return;
        }
        self.context_lost = false;
        self.last_error = None;
        self.clock.reset();
        self.render(REFERENCE_FRAME_MS);
        if !self.reduced_motion {
            self.state = EngineState::Running;
            self.schedule();
        }
        log::info!("[aurora] context restored");
    }

    pub fn on_resize(&mut self) {
        if matches!(self.state, EngineState::Running | EngineState::Paused) {
            self.backend.resize(&self.config);
        }
    }

    pub fn tune(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let tunable: Tunable = name.parse()?;
        self.config.set(tunable, value)?;
        self.refresh_surface(&[tunable]);
        log::info!("[aurora] {} = {}", tunable, value);
        Ok(())
    }

    /// Validates every entry before applying any of them.
    pub fn tune_patch<'a, I>(&mut self, entries: I) -> Result<Vec<Tunable>, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let changed = self.config.apply_patch(entries)?;
        self.refresh_surface(&changed);
        log::info!("[aurora] config updated: {:?}", self.config);
        Ok(changed)
    }

    fn refresh_surface(&mut self, changed: &[Tunable]) {
        let live = matches!(self.state, EngineState::Running | EngineState::Paused);
        if live && changed.iter().any(|t| t.affects_surface_size()) {
            self.backend.resize(&self.config);
        }
        if live && changed.contains(&Tunable::CanvasOpacity) {
            self.backend.set_canvas_opacity(self.config.canvas_opacity);
        }
        if live && changed.contains(&Tunable::FallbackOpacity) {
            self.backend.set_container_opacity(self.config.fallback_opacity);
        }
    }

    /// Emphasises `element` until [`release_spotlight`](Self::release_spotlight).
    pub fn spotlight(&mut self, element: &B::Element) -> bool {
        let rect = self.backend.element_rect(element);
        let lit = self
            .points
            .spotlight(element, rect, self.backend.viewport());
        if !lit {
            log::debug!("[aurora] spotlight ignored, no free influence slot");
        }
        lit
    }

    pub fn release_spotlight(&mut self, element: &B::Element) {
        self.points.release(element);
    }
}
