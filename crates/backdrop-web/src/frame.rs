use crate::dom;
use backdrop_core::{DrawLists, Scene, TeardownReport, Viewport};
use backdrop_gpu::{Renderer, SurfaceStatus};
use instant::{Duration, Instant};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const STATS_EVERY_FRAMES: u32 = 600;

/// Rolling frame-time average, logged at debug level.
pub struct FrameStats {
    last: Instant,
    accum: Duration,
    frames: u32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            accum: Duration::ZERO,
            frames: 0,
        }
    }

    fn tick(&mut self) {
        let now = Instant::now();
        self.accum += now - self.last;
        self.last = now;
        self.frames += 1;
        if self.frames >= STATS_EVERY_FRAMES {
            let avg_ms = self.accum.as_secs_f64() * 1000.0 / self.frames as f64;
            log::debug!("[web] avg frame {avg_ms:.2} ms over {} frames", self.frames);
            self.accum = Duration::ZERO;
            self.frames = 0;
        }
    }
}

pub struct FrameContext {
    pub scene: Option<Scene>,
    pub gpu: Option<Renderer<'static>>,
    pub draws: DrawLists,
    pub canvas: web::HtmlCanvasElement,
    /// Whether the canvas was created by us and should be removed on unmount.
    pub owns_canvas: bool,
    pub stats: FrameStats,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        self.stats.tick();
        scene.advance();

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        scene.collect_draws(&mut self.draws);
        if gpu.render(&scene.camera_uniform(), &self.draws) == SurfaceStatus::Fatal {
            log::error!("[gpu] out of memory, backdrop disabled");
            if let Some(gpu) = self.gpu.take() {
                gpu.destroy();
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let (w, h) = dom::sync_canvas_backing_size(&self.canvas, viewport);
        if let Some(scene) = &mut self.scene {
            scene.resize(viewport);
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
        }
    }

    /// Release the scene and GPU resources. Only the first call reports.
    pub fn shutdown(&mut self) -> Option<TeardownReport> {
        let report = self.scene.take().map(Scene::teardown);
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        if self.owns_canvas {
            self.canvas.remove();
            self.owns_canvas = false;
        }
        report
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    width: u32,
    height: u32,
    capacity: backdrop_core::DrawCapacity,
) -> Option<Renderer<'static>> {
    let instance = wgpu::Instance::default();
    let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
        Ok(s) => s,
        Err(e) => {
            log::error!("WebGPU surface error, backdrop disabled: {e}");
            return None;
        }
    };
    match Renderer::new(&instance, surface, width, height, capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error, backdrop disabled: {e}");
            None
        }
    }
}

/// Running animation-frame loop. Dropping it does not stop the loop; call
/// [`FrameLoop::cancel`].
pub struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameLoop {
    pub fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to itself.
        self.tick.borrow_mut().take();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, raf_id: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        raf_id.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf_id = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone, &raf_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick, &raf_id);
    FrameLoop { raf_id, tick }
}
