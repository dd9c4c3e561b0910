use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;

type FrameCallback = Closure<dyn FnMut(f64)>;

struct FrameState {
    pending: Option<i32>,
    callback: Option<FrameCallback>,
}

pub struct FrameLoop {
    state: Rc<RefCell<FrameState>>,
}

impl FrameLoop {
    pub fn start(mut tick: impl FnMut(f64) + 'static) -> Self {
        let state = Rc::new(RefCell::new(FrameState {
            pending: None,
            callback: None,
        }));

        let loop_state = Rc::downgrade(&state);
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            tick(timestamp);
            if let Some(state) = loop_state.upgrade() {
                request_next(&state);
            }
        });

        state.borrow_mut().callback = Some(callback);
        request_next(&state);

        Self { state }
    }
}

fn request_next(state: &Rc<RefCell<FrameState>>) {
    let Some(win) = window() else {
        return;
    };

    let mut state = state.borrow_mut();
    let Some(callback) = state.callback.as_ref() else {
        return;
    };

    let pending = win
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok();
    state.pending = pending;
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        if let (Some(id), Some(win)) = (state.pending.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
        state.callback = None;
    }
}
