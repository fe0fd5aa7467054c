#![deny(unsafe_code)]
//! Browser bindings for the ambient particle field.
//!
//! `mountBackdrop("canvas-id")` turns a `<canvas>` into a fixed,
//! full-viewport, input-transparent layer behind the page and starts the
//! field on it. The returned handle's `unmount()` cancels the pending
//! animation frame and removes the `resize` and `mousemove` listeners.
//!
//! A missing canvas or 2D context is not an error: mounting yields
//! `undefined` and the page carries on without a backdrop.

mod canvas;
mod console;
mod host;

use canvas::CanvasSurface;
use host::{Callbacks, WebHost};
use particle_field_core::{Backdrop, FieldConfig, Xorshift64};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent};

/// Everything one mounted field owns. Callbacks hold a `Weak` to it.
struct Mounted {
    backdrop: Backdrop,
    host: WebHost,
    surface: CanvasSurface,
}

impl Mounted {
    fn on_frame(&mut self) {
        let Some(handle) = self.host.take_pending() else {
            return;
        };
        self.backdrop.frame(handle, &mut self.host, &mut self.surface);
    }

    fn on_resize(&mut self) {
        if let Some((width, height)) = self.host.fit_canvas() {
            self.backdrop.resize(width, height);
        }
    }

    fn on_pointer(&mut self, event: &MouseEvent) {
        self.backdrop
            .pointer_moved(f64::from(event.client_x()), f64::from(event.client_y()));
    }
}

/// Runs `f` on the mounted field if it is still alive and not already
/// borrowed by another callback.
fn with_mounted(weak: &Weak<RefCell<Mounted>>, f: impl FnOnce(&mut Mounted)) {
    if let Some(rc) = weak.upgrade() {
        if let Ok(mut mounted) = rc.try_borrow_mut() {
            f(&mut mounted);
        }
    }
}

fn callbacks(weak: Weak<RefCell<Mounted>>) -> Callbacks {
    let frame = weak.clone();
    let resize = weak.clone();
    Callbacks {
        on_frame: Closure::new(move || with_mounted(&frame, Mounted::on_frame)),
        on_resize: Closure::new(move || with_mounted(&resize, Mounted::on_resize)),
        on_pointer: Closure::new(move |event: MouseEvent| {
            with_mounted(&weak, |m| m.on_pointer(&event))
        }),
    }
}

/// Pins the canvas behind page content without intercepting input.
fn style_as_backdrop(canvas: &HtmlCanvasElement) {
    let style = canvas.style();
    for (property, value) in [
        ("position", "fixed"),
        ("inset", "0"),
        ("pointer-events", "none"),
        ("z-index", "0"),
        ("background", "transparent"),
    ] {
        let _ = style.set_property(property, value);
    }
}

fn random_seed() -> u64 {
    let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let low = js_sys::Date::now() as u64;
    (high << 32) ^ low
}

/// A running backdrop. Dropping it unmounts.
#[wasm_bindgen]
pub struct BackdropHandle {
    mounted: Rc<RefCell<Mounted>>,
}

#[wasm_bindgen]
impl BackdropHandle {
    /// Stops the animation and detaches both window listeners.
    pub fn unmount(&self) {
        if let Ok(mut mounted) = self.mounted.try_borrow_mut() {
            let Mounted { backdrop, host, .. } = &mut *mounted;
            backdrop.unmount(host);
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.mounted.borrow().backdrop.is_running()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.mounted.borrow().backdrop.state().particles().len()
    }
}

impl Drop for BackdropHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Mounts the field on the canvas with id `canvas_id`.
///
/// `params` is an optional JSON object of config overrides; invalid
/// overrides are reported as an exception. Returns `undefined` when the
/// canvas, its 2D context, or the animation scheduler is unavailable.
#[wasm_bindgen(js_name = mountBackdrop)]
pub fn mount_backdrop(
    canvas_id: &str,
    params: Option<String>,
) -> Result<Option<BackdropHandle>, JsValue> {
    console::init(log::LevelFilter::Info);

    let config = match params.as_deref() {
        Some(json) => {
            let overrides: serde_json::Value =
                serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            FieldConfig::from_json(&overrides).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        None => FieldConfig::default(),
    };

    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Some(canvas) = window
        .document()
        .and_then(|doc| doc.get_element_by_id(canvas_id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    else {
        log::warn!("no canvas with id {canvas_id:?}; backdrop skipped");
        return Ok(None);
    };
    let Some(surface) = CanvasSurface::from_canvas(&canvas) else {
        log::warn!("2D context unavailable; backdrop skipped");
        return Ok(None);
    };

    style_as_backdrop(&canvas);
    let host = WebHost::new(window, canvas);
    if host.fit_canvas().is_none() {
        return Ok(None);
    }

    let mounted = Rc::new(RefCell::new(Mounted {
        backdrop: Backdrop::new(config, Xorshift64::new(random_seed())),
        host,
        surface,
    }));

    let started = {
        let mut m = mounted.borrow_mut();
        let m = &mut *m;
        m.host.set_callbacks(callbacks(Rc::downgrade(&mounted)));
        m.backdrop.mount(&mut m.host)
    };
    Ok(started.then_some(BackdropHandle { mounted }))
}
