//! [`Host`] on the browser window: `requestAnimationFrame` for frames,
//! `resize` and `mousemove` window listeners for events.

use particle_field_core::{FrameHandle, Host, HostEvent, ListenerId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

/// JS callbacks a mounted field hands to the browser.
///
/// They must outlive every registration made with them; [`WebHost`] keeps
/// them until it is dropped, after the backdrop has unmounted.
pub struct Callbacks {
    pub on_frame: Closure<dyn FnMut()>,
    pub on_resize: Closure<dyn FnMut()>,
    pub on_pointer: Closure<dyn FnMut(MouseEvent)>,
}

/// Browser window and the canvas a field is mounted on.
///
/// Tracks the pending animation frame and the listeners it attached so
/// both can be removed on unmount.
pub struct WebHost {
    window: Window,
    canvas: HtmlCanvasElement,
    callbacks: Option<Callbacks>,
    pending: Option<FrameHandle>,
    listeners: Vec<(ListenerId, HostEvent)>,
    next_listener: u64,
}

impl WebHost {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Self {
        Self {
            window,
            canvas,
            callbacks: None,
            pending: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = Some(callbacks);
    }

    /// Takes the frame that is about to run, so it can be handed to the
    /// backdrop exactly once.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Sizes the canvas backing store to the viewport and returns the size.
    pub fn fit_canvas(&self) -> Option<(usize, usize)> {
        let width = self.window.inner_width().ok()?.as_f64()?;
        let height = self.window.inner_height().ok()?.as_f64()?;
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        Some((width as usize, height as usize))
    }

    fn event_name(event: HostEvent) -> &'static str {
        match event {
            HostEvent::Resize => "resize",
            HostEvent::PointerMove => "mousemove",
        }
    }

    fn callback_for(&self, event: HostEvent) -> Option<&js_sys::Function> {
        let callbacks = self.callbacks.as_ref()?;
        Some(match event {
            HostEvent::Resize => callbacks.on_resize.as_ref().unchecked_ref(),
            HostEvent::PointerMove => callbacks.on_pointer.as_ref().unchecked_ref(),
        })
    }
}

impl Host for WebHost {
    fn surface_size(&self) -> Option<(usize, usize)> {
        self.canvas.is_connected().then(|| {
            (
                self.canvas.width() as usize,
                self.canvas.height() as usize,
            )
        })
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callbacks.as_ref()?.on_frame.as_ref().unchecked_ref();
        let id = self.window.request_animation_frame(callback).ok()?;
        let handle = FrameHandle(id as u64);
        self.pending = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0 as i32);
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn listen(&mut self, event: HostEvent) -> Option<ListenerId> {
        let callback = self.callback_for(event)?;
        self.window
            .add_event_listener_with_callback(Self::event_name(event), callback)
            .ok()?;
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, event));
        Some(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        let Some(pos) = self.listeners.iter().position(|&(l, _)| l == id) else {
            return;
        };
        let (_, event) = self.listeners.remove(pos);
        if let Some(callback) = self.callback_for(event) {
            let _ = self
                .window
                .remove_event_listener_with_callback(Self::event_name(event), callback);
        }
    }
}
