use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use js_sys::{Function, Reflect};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use motionkit_core::{
    checked_intervals, AnimationEngine, BoundingBox, Config, Interval, Matrix, MotionError,
    PlaybackController, PulseOptions, Segment, ShatterOptions, SpinOptions, Timeline,
};

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    swb::from_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn from_js_or_default<T>(value: JsValue, what: &str) -> Result<T, JsError>
where
    T: DeserializeOwned + Default,
{
    if jsvalue_is_undefined_or_null(&value) {
        Ok(T::default())
    } else {
        from_js(value, what)
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    swb::to_value(value).map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn motion_error(err: MotionError) -> JsError {
    JsError::new(&format!("{}: {err}", err.category()))
}

/// Engine handle living on the JS side (an anime.js timeline or anything
/// exposing `play/pause/reverse/restart/seek` and a `currentTime` field).
struct JsEngine {
    handle: JsValue,
}

const ENGINE_METHODS: [&str; 5] = ["play", "pause", "reverse", "restart", "seek"];

impl JsEngine {
    /// Wrap `handle` after checking it exposes every engine method and a
    /// `currentTime` field.
    fn from_handle(handle: JsValue) -> Result<Self, JsError> {
        if jsvalue_is_undefined_or_null(&handle) {
            return Err(JsError::new("engine handle is null/undefined"));
        }
        let mut missing: Vec<&str> = ENGINE_METHODS
            .iter()
            .copied()
            .filter(|m| {
                !Reflect::get(&handle, &JsValue::from_str(m))
                    .map(|f| f.is_function())
                    .unwrap_or(false)
            })
            .collect();
        if !Reflect::has(&handle, &JsValue::from_str("currentTime")).unwrap_or(false) {
            missing.push("currentTime");
        }
        if !missing.is_empty() {
            return Err(JsError::new(&format!(
                "engine handle is missing: {}",
                missing.join(", ")
            )));
        }
        Ok(Self { handle })
    }

    fn call(&self, method: &str, args: &[JsValue]) {
        let func = match Reflect::get(&self.handle, &JsValue::from_str(method)) {
            Ok(f) => f.dyn_into::<Function>().ok(),
            Err(_) => None,
        };
        let Some(func) = func else {
            log::warn!("engine has no callable '{method}'");
            return;
        };
        let res = match args {
            [] => func.call0(&self.handle),
            [a] => func.call1(&self.handle, a),
            _ => func.apply(&self.handle, &args.iter().collect::<js_sys::Array>()),
        };
        if let Err(e) = res {
            log::warn!("engine.{method} threw: {e:?}");
        }
    }
}

impl AnimationEngine for JsEngine {
    fn play(&mut self) {
        self.call("play", &[]);
    }

    fn pause(&mut self) {
        self.call("pause", &[]);
    }

    fn reverse(&mut self) {
        self.call("reverse", &[]);
    }

    fn restart(&mut self) {
        self.call("restart", &[]);
    }

    fn seek(&mut self, time_ms: f64) {
        self.call("seek", &[JsValue::from_f64(time_ms)]);
    }

    fn current_time(&self) -> f64 {
        Reflect::get(&self.handle, &JsValue::from_str("currentTime"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }
}

/// Timeline entries accepted from JS: engine-style segments or plain
/// `{start, end}` intervals.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimelineItem {
    Segment(Segment),
    Interval(Interval),
}

impl From<TimelineItem> for Interval {
    fn from(item: TimelineItem) -> Self {
        match item {
            TimelineItem::Segment(s) => s.into(),
            TimelineItem::Interval(iv) => iv,
        }
    }
}

struct Inner {
    controller: RefCell<PlaybackController<JsEngine>>,
    timeline: Timeline,
    palette: Vec<String>,
    frame: RefCell<Option<AnimationFrame>>,
    on_progress: RefCell<Option<Function>>,
}

impl Inner {
    fn schedule_frame(self: &Rc<Self>) {
        if self.frame.borrow().is_some() {
            return;
        }
        let inner = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            inner.frame.borrow_mut().take();
            inner.tick();
        });
        *self.frame.borrow_mut() = Some(handle);
    }

    fn tick(self: &Rc<Self>) {
        // Release the controller borrow before calling back into JS.
        let polled = self.controller.borrow_mut().on_frame();
        match polled {
            Ok(Some(progress)) => {
                let callback = self.on_progress.borrow().clone();
                if let Some(cb) = callback {
                    if let Err(e) = cb.call1(&JsValue::UNDEFINED, &JsValue::from_f64(progress)) {
                        log::warn!("progress callback threw: {e:?}");
                    }
                }
                if self.controller.borrow().is_polling() {
                    self.schedule_frame();
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("progress loop stopped: {e}"),
        }
    }

    fn cancel_frame(&self) {
        self.frame.borrow_mut().take();
    }
}

/// Playground timeline: packed rows for the visual bar chart plus
/// play/pause/reverse/scrub control over a JS animation engine.
#[wasm_bindgen]
pub struct MotionTimeline {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl MotionTimeline {
    /// `engine` is the JS animation handle. `items` is an array of
    /// `{offset, delay, duration}` or `{start, end}` objects in display
    /// order. `config` is optional; see `Config`.
    ///
    /// Example:
    ///   new MotionTimeline(tl, children, { playback: { scrub_width: 640 } })
    #[wasm_bindgen(constructor)]
    pub fn new(
        engine: JsValue,
        items: JsValue,
        config: JsValue,
    ) -> Result<MotionTimeline, JsError> {
        console_error_panic_hook::set_once();

        let engine = JsEngine::from_handle(engine)?;
        let cfg: Config = from_js_or_default(config, "config")?;
        let items: Vec<TimelineItem> = from_js_or_default(items, "timeline items")?;
        let timeline = Timeline::try_from_source(items).map_err(motion_error)?;

        let controller = PlaybackController::for_timeline(engine, &timeline, &cfg.playback);
        let polling = controller.is_polling();

        let inner = Rc::new(Inner {
            controller: RefCell::new(controller),
            timeline,
            palette: cfg.palette,
            frame: RefCell::new(None),
            on_progress: RefCell::new(None),
        });
        if polling {
            inner.schedule_frame();
        }
        Ok(MotionTimeline { inner })
    }

    /// Restart from the beginning.
    pub fn play(&self) -> Result<(), JsError> {
        self.inner.controller.borrow_mut().play().map_err(motion_error)
    }

    pub fn pause(&self) -> Result<(), JsError> {
        self.inner.controller.borrow_mut().pause().map_err(motion_error)
    }

    pub fn reverse(&self) -> Result<(), JsError> {
        self.inner.controller.borrow_mut().reverse().map_err(motion_error)
    }

    /// Pointer pressed on the scrub bar at `x` px from its left edge.
    /// Returns the time sought to.
    pub fn pointer_down(&self, x: f64) -> Result<f64, JsError> {
        self.inner
            .controller
            .borrow_mut()
            .on_pointer_down(x)
            .map_err(motion_error)
    }

    /// Returns the time sought to, or `undefined` when no drag is active.
    pub fn pointer_move(&self, x: f64) -> Result<Option<f64>, JsError> {
        self.inner
            .controller
            .borrow_mut()
            .on_pointer_move(x)
            .map_err(motion_error)
    }

    pub fn pointer_up(&self) {
        self.inner.controller.borrow_mut().on_pointer_up();
    }

    pub fn set_scrub_width(&self, width: f64) {
        self.inner.controller.borrow_mut().set_scrub_width(width);
    }

    pub fn rows(&self) -> u32 {
        self.inner.timeline.row_count() as u32
    }

    pub fn total_duration(&self) -> f64 {
        self.inner.timeline.total_duration()
    }

    /// Bars in input order: `{row, start, end, left_pct, width_pct, color}`.
    pub fn bars(&self) -> Result<JsValue, JsError> {
        to_js(&self.inner.timeline.layout(&self.inner.palette), "bars")
    }

    /// Snapshot of the playback state (`mode`, `current_time`, `dragging`,
    /// `direction`, `polling`).
    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(self.inner.controller.borrow().state(), "state")
    }

    /// Progress for the last polled time, `current_time / total_duration`.
    pub fn progress(&self) -> f64 {
        self.inner.controller.borrow().progress()
    }

    /// Start the per-frame progress loop. `callback(progress)` is invoked
    /// once per animation frame; passing nothing keeps the previous one.
    pub fn start_polling(&self, callback: Option<Function>) -> Result<(), JsError> {
        if !self.inner.controller.borrow().is_attached() {
            return Err(motion_error(MotionError::EngineDetached {
                operation: "start_polling",
            }));
        }
        if let Some(cb) = callback {
            *self.inner.on_progress.borrow_mut() = Some(cb);
        }
        self.inner.controller.borrow_mut().start_polling();
        self.inner.schedule_frame();
        Ok(())
    }

    pub fn stop_polling(&self) {
        self.inner.controller.borrow_mut().stop_polling();
        self.inner.cancel_frame();
    }

    /// Stop the frame loop and release the engine handle. Every later
    /// engine operation fails.
    pub fn teardown(&self) {
        self.inner.cancel_frame();
        self.inner.on_progress.borrow_mut().take();
        self.inner.controller.borrow_mut().teardown();
    }
}

impl Drop for MotionTimeline {
    fn drop(&mut self) {
        // The pending frame closure holds a clone of `inner`.
        self.inner.cancel_frame();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}

/// `[a, b, c, d, e, f]` → `"matrix(a,b,c,d,e,f)"`.
#[wasm_bindgen]
pub fn transform_string(matrix: JsValue) -> Result<String, JsError> {
    let m: Matrix = from_js(matrix, "matrix")?;
    Ok(m.to_string())
}

#[wasm_bindgen]
pub fn multiply(m1: JsValue, m2: JsValue) -> Result<JsValue, JsError> {
    let m1: Matrix = from_js(m1, "matrix")?;
    let m2: Matrix = from_js(m2, "matrix")?;
    to_js(&motionkit_core::multiply(&m1, &m2), "matrix")
}

#[wasm_bindgen]
pub fn rotate(angle_deg: f64) -> Result<JsValue, JsError> {
    to_js(&motionkit_core::rotate(angle_deg), "matrix")
}

#[wasm_bindgen]
pub fn translate(tx: f64, ty: f64) -> Result<JsValue, JsError> {
    to_js(&motionkit_core::translate(tx, ty), "matrix")
}

#[wasm_bindgen]
pub fn scale(sx: f64, sy: f64) -> Result<JsValue, JsError> {
    to_js(&motionkit_core::scale(sx, sy), "matrix")
}

/// Pivot point `{x, y}` for `spec` on `bbox` (`{x, y, width, height}`).
#[wasm_bindgen]
pub fn resolve_origin(bbox: JsValue, spec: &str) -> Result<JsValue, JsError> {
    let bbox: BoundingBox = from_js(bbox, "bbox")?;
    to_js(&motionkit_core::resolve_origin(&bbox, spec), "point")
}

/// `T(P) · matrix · T(-P)` for the pivot named by `spec`, as a matrix array.
#[wasm_bindgen]
pub fn compose_around_origin(
    bbox: JsValue,
    matrix: JsValue,
    spec: &str,
) -> Result<JsValue, JsError> {
    let bbox: BoundingBox = from_js(bbox, "bbox")?;
    let m: Matrix = from_js(matrix, "matrix")?;
    to_js(&motionkit_core::compose_around_origin(&bbox, &m, spec), "matrix")
}

/// Pack `{start, end}` (or segment) objects into rows. Output keeps input
/// order: `[{start, end, row}, ...]`. Reversed or non-finite intervals are
/// rejected.
#[wasm_bindgen]
pub fn pack_rows(items: JsValue) -> Result<JsValue, JsError> {
    let items: Vec<TimelineItem> = from_js(items, "intervals")?;
    let intervals = checked_intervals(items).map_err(motion_error)?;
    let packed = motionkit_core::pack_rows(intervals);
    to_js(&packed, "rows")
}

#[wasm_bindgen]
pub fn pulse(bbox: JsValue, options: JsValue) -> Result<JsValue, JsError> {
    let bbox: BoundingBox = from_js(bbox, "bbox")?;
    let opts: PulseOptions = from_js_or_default(options, "pulse options")?;
    to_js(&motionkit_core::pulse(&bbox, &opts), "pulse")
}

#[wasm_bindgen]
pub fn spin(options: JsValue) -> Result<JsValue, JsError> {
    let opts: SpinOptions = from_js_or_default(options, "spin options")?;
    to_js(&motionkit_core::spin(&opts), "spin")
}

/// Fragment plan for shattering `rect`. Pass `seed` for a reproducible
/// layout; otherwise `Math.random()` seeds the generator.
#[wasm_bindgen]
pub fn shatter(rect: JsValue, options: JsValue, seed: Option<u32>) -> Result<JsValue, JsError> {
    let rect: BoundingBox = from_js(rect, "rect")?;
    let opts: ShatterOptions = from_js_or_default(options, "shatter options")?;
    let seed = seed
        .map(u64::from)
        .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
    let mut rng = StdRng::seed_from_u64(seed);
    to_js(&motionkit_core::shatter(&rect, &opts, &mut rng), "shatter")
}
