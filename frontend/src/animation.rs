use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A `requestAnimationFrame` loop that runs until `tick` returns `false` or
/// the loop is dropped. `tick` receives `Date.now()` in milliseconds and must
/// not drop the `FrameLoop` that is driving it.
pub struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn start<F>(mut tick: F) -> Self
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        // Weak so the closure does not keep itself alive
        let next = Rc::downgrade(&callback);
        let frame_handle = handle.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            frame_handle.set(None);
            if !tick(js_sys::Date::now()) {
                return;
            }
            if let Some(callback) = next.upgrade() {
                frame_handle.set(request_frame(&callback));
            }
        }) as Box<dyn FnMut()>));

        handle.set(request_frame(&callback));
        Self { callback, handle }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(window)) = (self.handle.take(), window()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let callback = callback.borrow();
    let closure = callback.as_ref()?;
    window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}
