use std::sync::Arc;

use anyhow::Context;
use backdrop_core::{DrawLists, Scene, SceneParams, Viewport};
use backdrop_gpu::{Renderer, SurfaceStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::PhysicalSize;
use winit::{event::*, event_loop::EventLoop, window::Window, window::WindowBuilder};

const DEFAULT_SEED: u64 = 42;

fn seed_from_env() -> u64 {
    match std::env::var("BACKDROP_SEED") {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("BACKDROP_SEED={raw:?} is not a number, using {DEFAULT_SEED}");
            DEFAULT_SEED
        }),
        Err(_) => DEFAULT_SEED,
    }
}

fn viewport_for(window: &Window, size: PhysicalSize<u32>) -> Viewport {
    let scale = window.scale_factor();
    Viewport::new(
        size.width as f64 / scale,
        size.height as f64 / scale,
        scale,
    )
}

struct App {
    window: Arc<Window>,
    scene: Option<Scene>,
    gpu: Option<Renderer<'static>>,
    draws: DrawLists,
}

impl App {
    fn resize(&mut self, size: PhysicalSize<u32>) {
        let viewport = viewport_for(&self.window, size);
        if let Some(scene) = &mut self.scene {
            scene.resize(viewport);
        }
        if let Some(gpu) = &mut self.gpu {
            let (w, h) = viewport.surface_size();
            gpu.resize(w, h);
        }
    }

    /// Advance one step and draw it; without a renderer the scene still runs.
    fn frame(&mut self) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        scene.advance();
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        scene.collect_draws(&mut self.draws);
        if gpu.render(&scene.camera_uniform(), &self.draws) == SurfaceStatus::Fatal {
            log::error!("out of memory, rendering disabled");
            if let Some(gpu) = self.gpu.take() {
                gpu.destroy();
            }
        }
    }

    fn shutdown(&mut self) {
        if let Some(scene) = self.scene.take() {
            let report = scene.teardown();
            if report.assets.live != 0 {
                log::warn!("{} assets still live after teardown", report.assets.live);
            }
        }
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new().context("event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Backdrop (native)")
            .build(&event_loop)
            .context("window")?,
    );

    let seed = seed_from_env();
    log::info!("seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    let viewport = viewport_for(&window, window.inner_size());
    let scene = Scene::mount(SceneParams::default(), viewport, &mut rng)?;
    let (width, height) = viewport.surface_size();
    let capacity = scene.capacity();

    let instance = wgpu::Instance::default();
    let gpu = match instance.create_surface(window.clone()) {
        Ok(surface) => {
            match pollster::block_on(Renderer::new(
                &instance,
                surface,
                width,
                height,
                capacity,
            )) {
                Ok(g) => Some(g),
                Err(e) => {
                    log::error!("renderer unavailable, showing an empty window: {e}");
                    None
                }
            }
        }
        Err(e) => {
            log::error!("surface unavailable, showing an empty window: {e}");
            None
        }
    };

    let mut app = App {
        window,
        scene: Some(scene),
        gpu,
        draws: DrawLists::with_capacity(capacity),
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => app.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            app.shutdown();
            elwt.exit();
        }
        Event::AboutToWait => {
            app.frame();
            app.window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
