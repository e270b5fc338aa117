#![cfg(target_arch = "wasm32")]
//! Mounts the backdrop on a full-window WebGPU canvas behind the page.

mod dom;
mod events;
mod frame;

use backdrop_core::{DrawLists, Scene, SceneParams, TeardownReport};
use frame::{FrameContext, FrameLoop, FrameStats};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

const CANVAS_ID: &str = "backdrop-canvas";

struct Mounted {
    ctx: Rc<RefCell<FrameContext>>,
    frame_loop: FrameLoop,
    resize: events::ResizeListener,
}

enum Phase {
    Idle,
    Mounting,
    /// Unmount was requested while the renderer was still coming up.
    Cancelled,
    Running(Mounted),
}

thread_local! {
    static PHASE: RefCell<Phase> = const { RefCell::new(Phase::Idle) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web starting");

    PHASE.with(|p| *p.borrow_mut() = Phase::Mounting);
    spawn_local(async move {
        if let Err(e) = mount().await {
            log::error!("backdrop mount error: {:?}", e);
            PHASE.with(|p| *p.borrow_mut() = Phase::Idle);
        }
    });
    Ok(())
}

/// Stop the animation and release every scene and GPU resource. Safe to call
/// more than once; a call before mounting finished cancels the mount.
#[wasm_bindgen]
pub fn unmount_backdrop() {
    let previous = PHASE.with(|p| {
        let mut phase = p.borrow_mut();
        match std::mem::replace(&mut *phase, Phase::Idle) {
            Phase::Mounting => {
                *phase = Phase::Cancelled;
                None
            }
            Phase::Running(m) => Some(m),
            other => {
                *phase = other;
                None
            }
        }
    });
    let Some(mounted) = previous else {
        log::debug!("[web] unmount: nothing mounted");
        return;
    };
    mounted.frame_loop.cancel();
    mounted.resize.detach();
    let report = mounted.ctx.borrow_mut().shutdown();
    log_teardown(report);
}

fn log_teardown(report: Option<TeardownReport>) {
    if let Some(r) = report {
        if r.assets.live != 0 || r.release_errors != 0 {
            log::warn!(
                "[web] unmounted with {} live assets, {} release errors",
                r.assets.live,
                r.release_errors
            );
        } else {
            log::info!("[web] unmounted after {} frames", r.frames);
        }
    }
}

fn is_cancelled() -> bool {
    PHASE.with(|p| matches!(*p.borrow(), Phase::Cancelled))
}

async fn mount() -> anyhow::Result<()> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;
    let (canvas, owns_canvas) = dom::ensure_canvas(&document, CANVAS_ID)?;

    let mut rng = match dom::data_seed(&canvas) {
        Some(seed) => {
            log::info!("[web] seed {seed} from data-seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let viewport = dom::viewport(&window);
    let scene = match Scene::mount(SceneParams::default(), viewport, &mut rng) {
        Ok(scene) => scene,
        Err(e) => {
            if owns_canvas {
                canvas.remove();
            }
            return Err(e.into());
        }
    };
    let capacity = scene.capacity();
    let (w, h) = dom::sync_canvas_backing_size(&canvas, viewport);

    let mut ctx = FrameContext {
        scene: Some(scene),
        gpu: None,
        draws: DrawLists::with_capacity(capacity),
        canvas: canvas.clone(),
        owns_canvas,
        stats: FrameStats::new(),
    };
    ctx.gpu = frame::init_gpu(&canvas, w, h, capacity).await;

    if is_cancelled() {
        log_teardown(ctx.shutdown());
        PHASE.with(|p| *p.borrow_mut() = Phase::Idle);
        return Ok(());
    }

    let ctx = Rc::new(RefCell::new(ctx));
    let resize = match events::ResizeListener::attach(&window, ctx.clone()) {
        Ok(r) => r,
        Err(e) => {
            log_teardown(ctx.borrow_mut().shutdown());
            return Err(e);
        }
    };
    let frame_loop = frame::start_loop(ctx.clone());
    PHASE.with(|p| {
        *p.borrow_mut() = Phase::Running(Mounted {
            ctx,
            frame_loop,
            resize,
        })
    });
    Ok(())
}
