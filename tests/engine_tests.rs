// Host-side tests for the engine lifecycle, driven through a recording backend.

use aurora_web::core::{
    AuroraEngine, AuroraError, Backend, DeviceSignals, EngineState, FrameInputs, Rect,
    RenderConfig, ShaderStage, Tunable, Viewport,
};

#[derive(Default)]
struct Recorder {
    reduced_motion: bool,
    hidden: bool,
    no_canvas: bool,
    no_context: bool,
    broken_shader: bool,
    elements: Vec<(u32, Rect)>,

    program: bool,
    next_handle: u32,
    outstanding: Vec<u32>,
    builds: usize,
    draws: usize,
    resizes: usize,
    fallbacks: usize,
    released: usize,
    frames_released: bool,
    last_active: i32,
    last_time: f32,
    canvas_opacity: Option<f32>,
    container_opacity: Option<f32>,
}

impl Backend for Recorder {
    type Element = u32;
    type FrameHandle = u32;

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn page_visible(&self) -> bool {
        !self.hidden
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn locate_surface(&mut self, _config: &RenderConfig) -> Result<(), AuroraError> {
        if self.no_canvas {
            return Err(AuroraError::MissingSurface("liquid-aurora".into()));
        }
        Ok(())
    }

    fn ensure_glass_layer(&mut self) {}

    fn acquire_context(&mut self) -> Result<(), AuroraError> {
        if self.no_context {
            return Err(AuroraError::ContextUnavailable("WebGL not supported".into()));
        }
        Ok(())
    }

    fn upload_quad(&mut self) -> Result<(), AuroraError> {
        Ok(())
    }

    fn build_program(&mut self) -> Result<(), AuroraError> {
        self.builds += 1;
        if self.broken_shader {
            return Err(AuroraError::Compile {
                stage: ShaderStage::Fragment,
                log: "ERROR: 0:1: syntax error".into(),
            });
        }
        self.program = true;
        Ok(())
    }

    fn has_program(&self) -> bool {
        self.program
    }

    fn release_program(&mut self) {
        if self.program {
            self.released += 1;
        }
        self.program = false;
    }

    fn discard_program(&mut self) {
        self.program = false;
    }

    fn resize(&mut self, _config: &RenderConfig) {
        self.resizes += 1;
    }

    fn apply_static_fallback(&mut self, _config: &RenderConfig) {
        self.fallbacks += 1;
    }

    fn set_canvas_opacity(&mut self, opacity: f32) {
        self.canvas_opacity = Some(opacity);
    }

    fn set_container_opacity(&mut self, opacity: f32) {
        self.container_opacity = Some(opacity);
    }

    fn query_elements(&self) -> Vec<(u32, Rect)> {
        self.elements.clone()
    }

    fn element_rect(&self, element: &u32) -> Option<Rect> {
        self.elements
            .iter()
            .find(|(el, _)| el == element)
            .map(|(_, r)| *r)
    }

    fn request_frame(&mut self) -> Option<u32> {
        if self.frames_released {
            return None;
        }
        self.next_handle += 1;
        self.outstanding.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.outstanding.retain(|h| *h != handle);
    }

    fn release_frames(&mut self) {
        self.frames_released = true;
    }

    fn draw(&mut self, frame: &FrameInputs<'_>) {
        self.draws += 1;
        self.last_active = frame.points.active;
        self.last_time = frame.time;
    }
}

fn page() -> Recorder {
    Recorder {
        elements: vec![
            (1, Rect::new(40.0, 20.0, 120.0, 40.0)),
            (2, Rect::new(300.0, 200.0, 200.0, 200.0)),
            (3, Rect::new(600.0, 500.0, 4.0, 4.0)),
        ],
        ..Recorder::default()
    }
}

fn desktop() -> DeviceSignals {
    DeviceSignals {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into(),
        max_touch_points: 0,
        device_memory_gib: Some(8.0),
        viewport_width: 1280.0,
    }
}

fn engine(backend: Recorder) -> AuroraEngine<Recorder> {
    AuroraEngine::new(backend, &desktop())
}

/// Fires the single outstanding frame callback the way the browser would.
fn fire(engine: &mut AuroraEngine<Recorder>, now_ms: f64) {
    let pending = std::mem::take(&mut engine.backend_mut().outstanding);
    assert_eq!(pending.len(), 1, "expected exactly one scheduled frame");
    engine.on_frame(now_ms);
}

#[test]
fn init_starts_running_with_one_scheduled_frame() {
    let mut e = engine(page());
    e.init();
    assert_eq!(e.state(), EngineState::Running);
    assert!(e.has_pending_frame());
    assert_eq!(e.backend().outstanding.len(), 1);
    // first frame drawn synchronously
    assert_eq!(e.backend().draws, 1);
    // 1 wide element -> 3 points, 1 square, 1 too small
    assert_eq!(e.points().len(), 4);
    assert_eq!(e.backend().last_active, 4);
    assert_eq!(e.backend().container_opacity, Some(0.26));
    assert!(e.last_error().is_none());
}

#[test]
fn reduced_motion_shows_static_fallback_only() {
    let mut e = engine(Recorder {
        reduced_motion: true,
        ..page()
    });
    e.init();
    e.init();
    assert_eq!(e.state(), EngineState::Static);
    assert_eq!(e.backend().fallbacks, 1);
    assert_eq!(e.backend().builds, 0);

    e.resume();
    e.on_context_lost();
    e.on_context_restored();
    e.on_frame(100.0);
    assert_eq!(e.state(), EngineState::Static);
    assert!(e.backend().outstanding.is_empty());
    assert_eq!(e.backend().draws, 0);
}

#[test]
fn missing_canvas_aborts_quietly() {
    let mut e = engine(Recorder {
        no_canvas: true,
        ..page()
    });
    e.init();
    assert_eq!(e.state(), EngineState::Uninitialized);
    assert!(matches!(e.last_error(), Some(AuroraError::MissingSurface(_))));
    assert!(e.backend().outstanding.is_empty());
    assert_eq!(e.backend().draws, 0);
    assert!(!e.backend().has_program());
    assert_eq!(e.backend().builds, 0);
}

#[test]
fn missing_webgl_aborts_quietly() {
    let mut e = engine(Recorder {
        no_context: true,
        ..page()
    });
    e.init();
    assert_eq!(e.state(), EngineState::Uninitialized);
    assert!(matches!(
        e.last_error(),
        Some(AuroraError::ContextUnavailable(_))
    ));
    assert!(!e.last_error().unwrap().is_recoverable());
}

#[test]
fn shader_failure_is_final() {
    let mut e = engine(Recorder {
        broken_shader: true,
        ..page()
    });
    e.init();
    assert!(matches!(
        e.last_error(),
        Some(AuroraError::Compile {
            stage: ShaderStage::Fragment,
            ..
        })
    ));
    assert!(!e.has_pending_frame());

    e.init();
    e.resume();
    assert_eq!(e.backend().builds, 1);
    assert_eq!(e.state(), EngineState::Uninitialized);
}

#[test]
fn context_events_cannot_revive_a_failed_setup() {
    let mut e = engine(Recorder {
        broken_shader: true,
        ..page()
    });
    e.init();
    e.on_context_lost();
    // even if a rebuild would now succeed
    e.backend_mut().broken_shader = false;
    e.on_context_restored();
    assert_eq!(e.state(), EngineState::Uninitialized);
    assert!(!e.has_pending_frame());
    assert!(e.backend().outstanding.is_empty());
    assert_eq!(e.backend().builds, 1);
    assert!(e.points().is_empty());
    assert!(matches!(e.last_error(), Some(AuroraError::Compile { .. })));
}

#[test]
fn context_loss_before_init_is_ignored() {
    let mut e = engine(page());
    e.on_context_lost();
    e.on_context_restored();
    assert_eq!(e.state(), EngineState::Uninitialized);
    assert_eq!(e.backend().builds, 0);

    e.init();
    assert_eq!(e.state(), EngineState::Running);
}

#[test]
fn pause_cancels_the_scheduled_frame() {
    let mut e = engine(page());
    e.init();
    e.pause();
    e.pause();
    assert_eq!(e.state(), EngineState::Paused);
    assert!(e.backend().outstanding.is_empty());
    assert!(!e.has_pending_frame());

    e.resume();
    e.resume();
    assert_eq!(e.state(), EngineState::Running);
    assert_eq!(e.backend().outstanding.len(), 1);
}

#[test]
fn resume_waits_for_visibility() {
    let mut e = engine(page());
    e.init();
    e.pause();
    e.backend_mut().hidden = true;
    e.resume();
    assert_eq!(e.state(), EngineState::Paused);
    assert!(e.backend().outstanding.is_empty());
}

#[test]
fn init_on_hidden_page_starts_paused() {
    let mut e = engine(Recorder {
        hidden: true,
        ..page()
    });
    e.init();
    assert_eq!(e.state(), EngineState::Paused);
    assert!(e.backend().outstanding.is_empty());
}

#[test]
fn render_rate_follows_target_fps() {
    let mut e = engine(page());
    e.init();
    fire(&mut e, 0.0);
    for i in 1..=60 {
        fire(&mut e, i as f64 * 17.0);
    }
    // initial draw + one per 1/30 s over 1020 ms
    assert_eq!(e.backend().draws, 31);
    assert_eq!(e.backend().outstanding.len(), 1);
    assert!(e.time() > 0.0);
}

#[test]
fn destroy_is_terminal_and_idempotent() {
    let mut e = engine(page());
    e.init();
    e.destroy();
    e.destroy();
    assert_eq!(e.state(), EngineState::Destroyed);
    assert!(e.backend().outstanding.is_empty());
    assert_eq!(e.backend().released, 1);
    assert!(e.backend().frames_released);

    e.resume();
    e.on_frame(1_000.0);
    e.on_context_lost();
    e.on_context_restored();
    e.init();
    assert_eq!(e.state(), EngineState::Destroyed);
    assert_eq!(e.backend().draws, 1);
}

#[test]
fn context_loss_suspends_until_restored() {
    let mut e = engine(page());
    e.init();
    e.on_context_lost();
    assert_eq!(e.state(), EngineState::Uninitialized);
    assert!(e.backend().outstanding.is_empty());
    assert!(!e.backend().has_program());
    assert_eq!(e.last_error(), Some(&AuroraError::ContextLost));

    e.on_frame(500.0);
    e.resume();
    assert_eq!(e.backend().draws, 1);

    e.on_context_restored();
    assert_eq!(e.state(), EngineState::Running);
    assert_eq!(e.backend().outstanding.len(), 1);
    assert_eq!(e.backend().draws, 2);
    assert_eq!(e.backend().builds, 2);
    assert!(e.last_error().is_none());

    // a second restore event without a loss does nothing
    e.on_context_restored();
    assert_eq!(e.backend().outstanding.len(), 1);
    assert_eq!(e.backend().builds, 2);
}

#[test]
fn context_loss_while_paused_restores_to_running() {
    let mut e = engine(page());
    e.init();
    e.pause();
    e.on_context_lost();
    e.on_context_restored();
    assert_eq!(e.state(), EngineState::Running);
    assert_eq!(e.backend().outstanding.len(), 1);
}

#[test]
fn tuning_applies_live() {
    let mut e = engine(page());
    e.init();
    let resizes = e.backend().resizes;

    e.tune("glowStrength", 1.5).unwrap();
    assert!((e.config().glow_strength - 1.5).abs() < 1e-6);
    assert_eq!(e.backend().resizes, resizes);

    e.tune("resolution_scale", 0.5).unwrap();
    assert_eq!(e.backend().resizes, resizes + 1);

    e.tune_patch([("canvasOpacity", 0.8), ("fallbackOpacity", 0.1)])
        .unwrap();
    assert_eq!(e.backend().canvas_opacity, Some(0.8));
    assert_eq!(e.backend().container_opacity, Some(0.1));

    assert!(e.tune("nope", 1.0).is_err());
    let before = e.config().clone();
    assert!(e
        .tune_patch([("threshold", 0.5), ("targetFps", 500.0)])
        .is_err());
    assert_eq!(e.config(), &before);
    assert_eq!(e.config().get(Tunable::Threshold), before.threshold);
}

#[test]
fn resize_only_touches_a_live_surface() {
    let mut e = engine(page());
    e.on_resize();
    assert_eq!(e.backend().resizes, 0);
    e.init();
    let after_init = e.backend().resizes;
    e.on_resize();
    assert_eq!(e.backend().resizes, after_init + 1);
}

#[test]
fn spotlight_through_engine() {
    let mut e = engine(page());
    e.init();
    assert!(e.spotlight(&2));
    fire(&mut e, 0.0);
    fire(&mut e, 40.0);
    let mut out = *e.uniforms();
    assert_eq!(out.glowing, 1);

    e.release_spotlight(&2);
    fire(&mut e, 80.0);
    out = *e.uniforms();
    assert_eq!(out.glowing, 0);

    // untracked and off-page
    assert!(!e.spotlight(&99));
}

#[test]
fn mobile_profile_limits_points() {
    let mut many = page();
    many.elements = (0..10)
        .map(|i| (i, Rect::new(i as f64 * 100.0, 0.0, 60.0, 60.0)))
        .collect();
    let signals = DeviceSignals {
        user_agent: "Mozilla/5.0 (Linux; Android 14) Mobile".into(),
        ..desktop()
    };
    let mut e = AuroraEngine::new(many, &signals);
    e.init();
    assert_eq!(e.points().capacity(), 6);
    assert_eq!(e.points().len(), 6);
    assert!((e.config().target_fps - 28.0).abs() < 1e-6);
}
