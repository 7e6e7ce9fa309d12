use crate::constants::{
    is_ios, IDLE_TIMEOUT_IOS_MS, IDLE_TIMEOUT_MS, START_DELAY_IOS_MS, START_DELAY_MS,
};
use crate::core::{AuroraEngine, ConfigError, EngineState, Tunable};
use crate::frame::{self, SharedEngine};
use crate::render::WebBackend;
use crate::{dom, events};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys as web;

/// Installs the panic hook and logger. The page boots the background with
/// `startAurora()`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}

/// Handle to one animated background. Pages normally get theirs from
/// `startAurora()`.
#[wasm_bindgen]
pub struct AuroraBackground {
    engine: SharedEngine,
    window: web::Window,
    document: web::Document,
    listeners_wired: Cell<bool>,
}

#[wasm_bindgen]
impl AuroraBackground {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<AuroraBackground, JsValue> {
        let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let signals = dom::device_signals(&window);
        let tick = frame::new_tick();
        let backend = WebBackend::new(window.clone(), document.clone(), tick.clone());
        let engine = Rc::new(RefCell::new(AuroraEngine::new(backend, &signals)));
        frame::install_tick(&tick, engine.clone());
        Ok(Self {
            engine,
            window,
            document,
            listeners_wired: Cell::new(false),
        })
    }

    pub fn init(&self) {
        self.engine.borrow_mut().init();
        self.wire_listeners();
    }

    pub fn pause(&self) {
        self.engine.borrow_mut().pause();
    }

    pub fn resume(&self) {
        self.engine.borrow_mut().resume();
    }

    pub fn destroy(&self) {
        self.engine.borrow_mut().destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.engine.borrow().state().to_string()
    }

    /// Sets one tunable by its camelCase or snake_case name.
    pub fn tune(&self, name: &str, value: f64) -> Result<(), JsValue> {
        self.engine
            .borrow_mut()
            .tune(name, value)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Applies `{ name: value, ... }`. Nothing changes if any entry is rejected.
    #[wasm_bindgen(js_name = tunePatch)]
    pub fn tune_patch(&self, patch: &js_sys::Object) -> Result<(), JsValue> {
        let mut entries = Vec::new();
        for entry in js_sys::Object::entries(patch).iter() {
            let pair = js_sys::Array::from(&entry);
            let key = pair.get(0).as_string().unwrap_or_default();
            let value = pair.get(1).as_f64().ok_or_else(|| {
                let err = ConfigError::InvalidPatch(format!("`{}` is not a number", key));
                JsValue::from_str(&err.to_string())
            })?;
            entries.push((key, value));
        }
        self.engine
            .borrow_mut()
            .tune_patch(entries.iter().map(|(k, v)| (k.as_str(), *v)))
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current tunables keyed by camelCase name.
    pub fn config(&self) -> js_sys::Object {
        let out = js_sys::Object::new();
        let engine = self.engine.borrow();
        for tunable in Tunable::ALL {
            let value = engine.config().get(tunable) as f64;
            _ = js_sys::Reflect::set(
                &out,
                &JsValue::from_str(tunable.js_name()),
                &JsValue::from_f64(value),
            );
        }
        out
    }

    pub fn spotlight(&self, element: &web::Element) -> bool {
        self.engine.borrow_mut().spotlight(element)
    }

    #[wasm_bindgen(js_name = releaseSpotlight)]
    pub fn release_spotlight(&self, element: &web::Element) {
        self.engine.borrow_mut().release_spotlight(element);
    }
}

impl AuroraBackground {
    fn wire_listeners(&self) {
        if self.listeners_wired.get() {
            return;
        }
        let (state, canvas) = {
            let engine = self.engine.borrow();
            (engine.state(), engine.backend().canvas().cloned())
        };
        if let Some(canvas) = canvas {
            events::wire_context_events(&canvas, &self.engine);
        }
        if matches!(state, EngineState::Running | EngineState::Paused) {
            events::wire_lifecycle(&self.window, &self.document, &self.engine);
        }
        self.listeners_wired.set(true);
    }
}

/// Starts the page's background once, after load and an idle period. Resolves
/// to the handle, or `undefined` when already started or startup failed.
#[wasm_bindgen(js_name = startAurora)]
pub fn start_aurora() -> js_sys::Promise {
    static STARTED: AtomicBool = AtomicBool::new(false);
    future_to_promise(async move {
        if STARTED.swap(true, Ordering::SeqCst) {
            log::info!("[aurora] already started");
            return Ok(JsValue::UNDEFINED);
        }
        match boot().await {
            Ok(aurora) => Ok(aurora.into()),
            Err(e) => {
                log::error!("[aurora] startup error: {:?}", e);
                Ok(JsValue::UNDEFINED)
            }
        }
    })
}

async fn boot() -> anyhow::Result<AuroraBackground> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    wait_for_load(&window, &document).await?;

    let navigator = window.navigator();
    let ios = is_ios(
        &navigator.user_agent().unwrap_or_default(),
        &navigator.platform().unwrap_or_default(),
        navigator.max_touch_points(),
    );
    let (delay_ms, idle_timeout_ms) = if ios {
        (START_DELAY_IOS_MS, IDLE_TIMEOUT_IOS_MS)
    } else {
        (START_DELAY_MS, IDLE_TIMEOUT_MS)
    };
    wait_for_idle(&window, idle_timeout_ms).await?;
    sleep(&window, delay_ms).await?;

    let aurora = AuroraBackground::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    aurora.init();
    Ok(aurora)
}

async fn wait_for_load(window: &web::Window, document: &web::Document) -> anyhow::Result<()> {
    if document.ready_state() == "complete" {
        return Ok(());
    }
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        _ = window.add_event_listener_with_callback("load", &resolve);
    });
    JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

/// Waits for `requestIdleCallback` where the browser has it.
async fn wait_for_idle(window: &web::Window, timeout_ms: i32) -> anyhow::Result<()> {
    let ric = js_sys::Reflect::get(window, &JsValue::from_str("requestIdleCallback"))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let Some(ric) = ric.dyn_ref::<js_sys::Function>() else {
        return Ok(());
    };
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let opts = js_sys::Object::new();
        _ = js_sys::Reflect::set(
            &opts,
            &JsValue::from_str("timeout"),
            &JsValue::from(timeout_ms),
        );
        _ = ric.call2(window, &resolve, &opts);
    });
    JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

async fn sleep(window: &web::Window, ms: i32) -> anyhow::Result<()> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
    });
    JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}
