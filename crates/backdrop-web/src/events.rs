use crate::dom;
use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Window `resize` listener that keeps its closure so it can be removed again.
pub struct ResizeListener {
    window: web::Window,
    closure: Closure<dyn FnMut()>,
}

impl ResizeListener {
    pub fn attach(
        window: &web::Window,
        frame_ctx: Rc<RefCell<FrameContext>>,
    ) -> anyhow::Result<Self> {
        let win = window.clone();
        let closure = Closure::wrap(Box::new(move || {
            let viewport = dom::viewport(&win);
            log::debug!(
                "[web] resize {}x{} @{}",
                viewport.css_width,
                viewport.css_height,
                viewport.pixel_ratio
            );
            frame_ctx.borrow_mut().resize(viewport);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add resize listener: {e:?}"))?;
        Ok(Self {
            window: window.clone(),
            closure,
        })
    }

    pub fn detach(self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
    }
}
