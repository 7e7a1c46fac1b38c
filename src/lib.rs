// carousel_core: Rust/WASM carousel engine.
// All selection, layout and timing logic lives here; JS measures, renders and forwards events.
// See DESIGN.md for the module map.

mod carousel;
mod config;
mod error;
mod geometry;
mod layout;
mod timer;
mod types;

use wasm_bindgen::prelude::*;

pub use carousel::{Carousel, SETTLE_DELAY};
pub use config::{
    compute_displayed, compute_per_slide, resolve, Animation, ConfigInput, DeclaredAttributes,
    OptionKey, RawOptions, ResolvedConfig, SyncMode,
};
pub use error::CarouselError;
pub use geometry::{GeometryProvider, MeasuredGeometry};
pub use layout::{compute_index, loop_until, margin};
pub use timer::{Task, TimerHandle, TimerService, VirtualClock};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(err: CarouselError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Carousel engine exposed to JavaScript.
///
/// Slides are identified by numeric ids chosen by the host. The host pushes
/// measurements in with `set_slide_size` / `set_container_width`, feeds time
/// with `advance`, and reads styles back as JSON.
///
/// # Example JSON Config
/// ```json
/// {
///   "options": { "displayed": 3, "perSlide": 1, "onSlide": true },
///   "declared": { "present": ["autoplay"], "values": { "autoplay": false } }
/// }
/// ```
#[wasm_bindgen]
pub struct WasmCarousel {
    inner: Carousel<u32, MeasuredGeometry<u32>>,
    on_slide: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl WasmCarousel {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmCarousel, JsValue> {
        let mut inner = Carousel::new(MeasuredGeometry::new());
        inner.configure_json(config_json).map_err(js_err)?;
        Ok(WasmCarousel {
            inner,
            on_slide: None,
        })
    }

    /// Re-resolve configuration. Returns the resolved config as JSON.
    pub fn configure(&mut self, config_json: &str) -> Result<String, JsValue> {
        let config = self.inner.configure_json(config_json).map_err(js_err)?;
        serde_json::to_string(config).map_err(|e| js_err(e.into()))
    }

    /// Function called with the new active index once a transition finishes.
    pub fn set_on_slide(&mut self, callback: js_sys::Function) {
        self.on_slide = Some(callback);
    }

    pub fn set_slides(&mut self, ids: Vec<u32>) {
        self.inner.set_slides(ids);
    }

    pub fn add_slide(&mut self, id: u32) {
        self.inner.add_slide(id);
    }

    pub fn remove_slide(&mut self, id: u32) {
        self.inner.remove_slide(&id);
        self.inner.geometry_mut().forget(&id);
    }

    pub fn set_slide_size(&mut self, id: u32, width: f64, height: f64) {
        self.inner
            .geometry_mut()
            .set_size(id, SlideSize::new(width, height));
    }

    /// Pass a negative width to clear it.
    pub fn set_container_width(&mut self, width: f64) {
        let width = (width >= 0.0).then_some(width);
        self.inner.geometry_mut().set_container_width(width);
    }

    /// Move to `"next"`, `"prev"` or an index given as a string.
    pub fn move_to(&mut self, target: &str, is_user_action: bool) -> Result<(), JsValue> {
        self.inner.move_str(target, is_user_action).map_err(js_err)
    }

    pub fn next(&mut self) {
        self.inner.next();
    }

    pub fn prev(&mut self) {
        self.inner.prev();
    }

    pub fn start(&mut self) {
        let stop = self.inner.should_stop();
        self.inner.set_interval(stop);
    }

    pub fn pause(&mut self) {
        self.inner.pause();
    }

    pub fn resume(&mut self) {
        self.inner.resume();
    }

    pub fn mouse_enter(&mut self) {
        self.inner.mouse_enter();
    }

    pub fn mouse_leave(&mut self) {
        self.inner.mouse_leave();
    }

    pub fn update(&mut self, reset_timer: bool) {
        self.inner.update(reset_timer);
    }

    pub fn resize(&mut self) {
        self.inner.resize();
    }

    pub fn shift(&mut self, offset: f64) {
        self.inner.shift(offset);
    }

    pub fn mark_ready(&mut self) {
        self.inner.mark_ready();
    }

    /// Advance the engine clock and run whatever fell due.
    /// Returns the queued host events as JSON; `Slid` events also go to the onSlide callback.
    pub fn advance(&mut self, elapsed_ms: u32) -> Result<String, JsValue> {
        self.inner.advance(Millis::new(u64::from(elapsed_ms)));
        let events = self.inner.take_events();

        if let Some(callback) = &self.on_slide {
            for event in &events {
                if let CarouselEvent::Slid { index } = event {
                    callback.call1(&JsValue::NULL, &JsValue::from_f64(*index as f64))?;
                }
            }
        }

        serde_json::to_string(&events).map_err(|e| js_err(e.into()))
    }

    /// Track styles as JSON, e.g. `{"offsetX":-240.0}`.
    pub fn styles(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.styles()).map_err(|e| js_err(e.into()))
    }

    /// Active index as a JS number. Explicit jumps are stored unclamped, so
    /// indices past 2^53 lose precision here.
    pub fn active_index(&self) -> f64 {
        self.inner.active_index() as f64
    }

    pub fn is_centered(&self) -> bool {
        self.inner.is_centered()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    pub fn should_hide_nav(&self) -> bool {
        self.inner.should_hide_nav()
    }

    pub fn should_hide_pager(&self) -> bool {
        self.inner.should_hide_pager()
    }
}
