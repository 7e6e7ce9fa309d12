use crate::constants::{influence_selector, CANVAS_ID};
use crate::core::shaders::{self, AURORA_FRAG, AURORA_VERT, FULLSCREEN_QUAD, POSITION_ATTRIBUTE};
use crate::core::{
    backing_size, AuroraError, Backend, FrameInputs, Rect, RenderConfig, ShaderStage, Viewport,
};
use crate::frame::{self, FrameTick};
use crate::{dom, overlay};
use fnv::FnvHashMap;
use wasm_bindgen::JsCast;
use web_sys as web;
use web_sys::WebGlRenderingContext as Gl;

// ===================== WebGL 1 backend =====================

pub struct WebBackend {
    window: web::Window,
    document: web::Document,
    canvas: Option<web::HtmlCanvasElement>,
    gl: Option<Gl>,
    quad: Option<web::WebGlBuffer>,
    program: Option<web::WebGlProgram>,
    uniforms: FnvHashMap<&'static str, web::WebGlUniformLocation>,
    tick: FrameTick,
}

impl WebBackend {
    pub fn new(window: web::Window, document: web::Document, tick: FrameTick) -> Self {
        Self {
            window,
            document,
            canvas: None,
            gl: None,
            quad: None,
            program: None,
            uniforms: FnvHashMap::default(),
            tick,
        }
    }

    pub fn canvas(&self) -> Option<&web::HtmlCanvasElement> {
        self.canvas.as_ref()
    }

    fn find_canvas(&self) -> Option<web::HtmlCanvasElement> {
        self.document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    }

    #[inline]
    fn uniform(&self, name: &str) -> Option<&web::WebGlUniformLocation> {
        self.uniforms.get(name)
    }
}

fn get_webgl(canvas: &web::HtmlCanvasElement) -> Option<Gl> {
    let attrs = web::WebGlContextAttributes::new();
    attrs.set_alpha(true);
    attrs.set_antialias(false);
    let ctx = canvas
        .get_context_with_context_options("webgl", &attrs)
        .ok()
        .flatten()
        .or_else(|| canvas.get_context("experimental-webgl").ok().flatten())?;
    ctx.dyn_into::<Gl>().ok()
}

fn compile_shader(
    gl: &Gl,
    kind: u32,
    source: &str,
    stage: ShaderStage,
) -> Result<web::WebGlShader, AuroraError> {
    let shader = gl.create_shader(kind).ok_or_else(|| AuroraError::Compile {
        stage,
        log: "createShader returned null".into(),
    })?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        return Ok(shader);
    }
    let log = gl.get_shader_info_log(&shader).unwrap_or_default();
    gl.delete_shader(Some(&shader));
    Err(AuroraError::Compile { stage, log })
}

fn link_program(
    gl: &Gl,
    vs: &web::WebGlShader,
    fs: &web::WebGlShader,
) -> Result<web::WebGlProgram, AuroraError> {
    let program = gl
        .create_program()
        .ok_or_else(|| AuroraError::Link("createProgram returned null".into()))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);
    let ok = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        return Ok(program);
    }
    let log = gl.get_program_info_log(&program).unwrap_or_default();
    gl.delete_program(Some(&program));
    Err(AuroraError::Link(log))
}

impl Backend for WebBackend {
    type Element = web::Element;
    type FrameHandle = i32;

    fn prefers_reduced_motion(&self) -> bool {
        dom::prefers_reduced_motion(&self.window)
    }

    fn page_visible(&self) -> bool {
        dom::page_visible(&self.document)
    }

    fn viewport(&self) -> Viewport {
        dom::viewport(&self.window)
    }

    fn locate_surface(&mut self, config: &RenderConfig) -> Result<(), AuroraError> {
        let canvas = self
            .find_canvas()
            .ok_or_else(|| AuroraError::MissingSurface(CANVAS_ID.to_string()))?;
        overlay::pin_canvas(&canvas, config.canvas_opacity);
        self.canvas = Some(canvas);
        Ok(())
    }

    fn ensure_glass_layer(&mut self) {
        overlay::ensure_glass_layer(&self.document);
    }

    fn acquire_context(&mut self) -> Result<(), AuroraError> {
        let canvas = self
            .canvas
            .as_ref()
            .ok_or_else(|| AuroraError::MissingSurface(CANVAS_ID.to_string()))?;
        let gl = get_webgl(canvas)
            .ok_or_else(|| AuroraError::ContextUnavailable("WebGL not supported".into()))?;
        gl.enable(Gl::BLEND);
        gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
        self.gl = Some(gl);
        Ok(())
    }

    fn upload_quad(&mut self) -> Result<(), AuroraError> {
        let gl = self
            .gl
            .as_ref()
            .ok_or_else(|| AuroraError::ContextUnavailable("no context".into()))?;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| AuroraError::BufferUpload("createBuffer returned null".into()))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        let vertices = js_sys::Float32Array::from(&FULLSCREEN_QUAD[..]);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &vertices, Gl::STATIC_DRAW);
        self.quad = Some(buffer);
        Ok(())
    }

    fn build_program(&mut self) -> Result<(), AuroraError> {
        let gl = self
            .gl
            .as_ref()
            .ok_or_else(|| AuroraError::ContextUnavailable("no context".into()))?;
        let vs = compile_shader(gl, Gl::VERTEX_SHADER, AURORA_VERT, ShaderStage::Vertex)?;
        let fs = match compile_shader(gl, Gl::FRAGMENT_SHADER, AURORA_FRAG, ShaderStage::Fragment)
        {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(Some(&vs));
                return Err(e);
            }
        };
        let linked = link_program(gl, &vs, &fs);
        // the program keeps its own reference once linked
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        let program = linked?;
        gl.use_program(Some(&program));

        let position = gl.get_attrib_location(&program, POSITION_ATTRIBUTE);
        if position < 0 {
            gl.delete_program(Some(&program));
            return Err(AuroraError::Link(format!(
                "attribute {} not found",
                POSITION_ATTRIBUTE
            )));
        }
        gl.enable_vertex_attrib_array(position as u32);
        gl.vertex_attrib_pointer_with_i32(position as u32, 2, Gl::FLOAT, false, 0, 0);

        let mut uniforms = FnvHashMap::default();
        for name in shaders::UNIFORM_NAMES {
            // unused uniforms are optimised out and have no location
            if let Some(loc) = gl.get_uniform_location(&program, name) {
                uniforms.insert(name, loc);
            }
        }
        log::debug!("[aurora] program linked, {} uniforms", uniforms.len());
        self.uniforms = uniforms;
        self.program = Some(program);
        Ok(())
    }

    fn has_program(&self) -> bool {
        self.program.is_some() && self.quad.is_some()
    }

    fn release_program(&mut self) {
        if let (Some(gl), Some(program)) = (&self.gl, self.program.take()) {
            gl.delete_program(Some(&program));
        }
        self.uniforms.clear();
    }

    fn discard_program(&mut self) {
        self.program = None;
        self.quad = None;
        self.uniforms.clear();
    }

    fn resize(&mut self, config: &RenderConfig) {
        let Some(canvas) = &self.canvas else {
            return;
        };
        let viewport = dom::viewport(&self.window);
        let (w, h) = backing_size(
            viewport,
            self.window.device_pixel_ratio(),
            config.dpr_cap as f64,
            config.resolution_scale as f64,
        );
        canvas.set_width(w);
        canvas.set_height(h);
        let css_width = format!("{}px", viewport.width);
        let css_height = format!("{}px", viewport.height);
        dom::set_styles(
            canvas,
            &[("width", css_width.as_str()), ("height", css_height.as_str())],
        );
        if let Some(gl) = &self.gl {
            gl.viewport(0, 0, w as i32, h as i32);
        }
    }

    fn apply_static_fallback(&mut self, config: &RenderConfig) {
        match self.find_canvas() {
            Some(canvas) => overlay::show_static_fallback(&canvas, config.canvas_opacity),
            None => log::warn!("[aurora] canvas #{} not found for fallback", CANVAS_ID),
        }
    }

    fn set_canvas_opacity(&mut self, opacity: f32) {
        if let Some(canvas) = &self.canvas {
            overlay::set_opacity(canvas, opacity);
        }
    }

    fn set_container_opacity(&mut self, opacity: f32) {
        overlay::set_container_opacity(&self.document, opacity);
    }

    fn query_elements(&self) -> Vec<(web::Element, Rect)> {
        dom::query_elements(&self.document, &influence_selector())
            .into_iter()
            .map(|el| {
                let rect = dom::element_rect(&el);
                (el, rect)
            })
            .collect()
    }

    fn element_rect(&self, element: &web::Element) -> Option<Rect> {
        element
            .is_connected()
            .then(|| dom::element_rect(element))
    }

    fn request_frame(&mut self) -> Option<i32> {
        frame::request(&self.window, &self.tick)
    }

    fn cancel_frame(&mut self, handle: i32) {
        _ = self.window.cancel_animation_frame(handle);
    }

    fn release_frames(&mut self) {
        // the callback owns an engine handle; dropping it breaks the cycle
        self.tick.borrow_mut().take();
    }

    fn draw(&mut self, frame: &FrameInputs<'_>) {
        let (Some(gl), Some(canvas)) = (&self.gl, &self.canvas) else {
            return;
        };
        let cfg = frame.config;
        let pts = frame.points;

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(Gl::COLOR_BUFFER_BIT);

        gl.uniform1f(self.uniform(shaders::U_TIME), frame.time);
        gl.uniform2f(
            self.uniform(shaders::U_RESOLUTION),
            canvas.width() as f32,
            canvas.height() as f32,
        );
        gl.uniform1f(self.uniform(shaders::U_DRIFT_SPEED), cfg.base_drift_speed);
        gl.uniform1f(
            self.uniform(shaders::U_ATTRACTION_STRENGTH),
            cfg.attraction_strength,
        );
        gl.uniform1f(
            self.uniform(shaders::U_ATTRACTION_FALLOFF),
            cfg.attraction_falloff,
        );
        gl.uniform1f(self.uniform(shaders::U_GLOW_STRENGTH), cfg.glow_strength);
        gl.uniform1f(self.uniform(shaders::U_COLOR_INTENSITY), cfg.color_intensity);
        gl.uniform1f(self.uniform(shaders::U_THRESHOLD), cfg.threshold);

        gl.uniform3fv_with_f32_array(self.uniform(shaders::U_POINTS), pts.attractor_floats());
        gl.uniform4fv_with_f32_array(self.uniform(shaders::U_MASKS), pts.mask_floats());
        gl.uniform1i(self.uniform(shaders::U_POINT_COUNT), pts.active);
        gl.uniform3fv_with_f32_array(self.uniform(shaders::U_GLOW_POINTS), pts.glow_floats());
        gl.uniform1i(self.uniform(shaders::U_GLOW_COUNT), pts.glowing);

        gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
    }
}
