use crate::error::RenderError;
use crate::pipelines::{self, QUAD_CORNERS};
use backdrop_core::{CameraUniform, DrawCapacity, DrawLists, LineVertex, PointInstance};
use wgpu::util::DeviceExt;

/// Outcome of one frame submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceStatus {
    Presented,
    /// Frame dropped; the surface was reconfigured or timed out and the next
    /// frame should succeed.
    Skipped,
    /// The device is out of memory; the renderer should be dropped.
    Fatal,
}

pub struct Renderer<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    camera: pipelines::CameraResources,
    points_pipeline: wgpu::RenderPipeline,
    lines_pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    line_vb: wgpu::Buffer,
    capacity: DrawCapacity,
}

impl<'w> Renderer<'w> {
    /// Bring up a device for `surface` and build every pipeline and buffer.
    /// Buffers are sized once from `capacity`; the scene never grows.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        width: u32,
        height: u32,
        capacity: DrawCapacity,
    ) -> Result<Self, RenderError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                    label: Some("backdrop_device"),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;
        // Transparent clear only shows the page through with pre-multiplied alpha.
        let alpha_mode = caps
            .alpha_modes
            .iter()
            .copied()
            .find(|m| *m == wgpu::CompositeAlphaMode::PreMultiplied)
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] adapter={} format={:?} alpha={:?} size={}x{}",
            adapter.get_info().name,
            format,
            alpha_mode,
            config.width,
            config.height
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop_shader"),
            source: wgpu::ShaderSource::Wgsl(backdrop_core::BACKDROP_WGSL.into()),
        });
        let camera = pipelines::create_camera_resources(&device);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop_pl"),
            bind_group_layouts: &[&camera.layout],
            push_constant_ranges: &[],
        });
        let points_pipeline = pipelines::create_points_pipeline(&device, &layout, &shader, format);
        let lines_pipeline = pipelines::create_lines_pipeline(&device, &layout, &shader, format);

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_vb"),
            size: (std::mem::size_of::<PointInstance>() * capacity.points.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let line_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_vb"),
            size: (std::mem::size_of::<LineVertex>() * capacity.line_vertices.max(1)) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            points_pipeline,
            lines_pipeline,
            quad_vb,
            instance_vb,
            line_vb,
            capacity,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface for a new backing size; zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload this frame's records and submit a single render pass.
    pub fn render(&mut self, camera: &CameraUniform, draws: &DrawLists) -> SurfaceStatus {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return SurfaceStatus::Skipped;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return SurfaceStatus::Fatal,
            Err(e) => {
                log::debug!("[gpu] frame skipped: {e:?}");
                return SurfaceStatus::Skipped;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let points = &draws.points[..draws.points.len().min(self.capacity.points)];
        let lines = &draws.lines[..draws.lines.len().min(self.capacity.line_vertices)];
        self.queue
            .write_buffer(&self.camera.uniform_buffer, 0, bytemuck::bytes_of(camera));
        if !points.is_empty() {
            self.queue
                .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(points));
        }
        if !lines.is_empty() {
            self.queue
                .write_buffer(&self.line_vb, 0, bytemuck::cast_slice(lines));
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("backdrop_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.camera.bind_group, &[]);
            if !lines.is_empty() {
                rpass.set_pipeline(&self.lines_pipeline);
                rpass.set_vertex_buffer(0, self.line_vb.slice(..));
                rpass.draw(0..lines.len() as u32, 0..1);
            }
            if !points.is_empty() {
                rpass.set_pipeline(&self.points_pipeline);
                rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
                rpass.draw(0..6, 0..points.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        SurfaceStatus::Presented
    }

    /// Destroy every buffer now instead of waiting for the drop; returns how
    /// many were destroyed. The surface and device go with `self`.
    pub fn destroy(self) -> usize {
        let buffers = [
            &self.camera.uniform_buffer,
            &self.quad_vb,
            &self.instance_vb,
            &self.line_vb,
        ];
        for b in buffers {
            b.destroy();
        }
        log::info!("[gpu] destroyed {} buffers", buffers.len());
        buffers.len()
    }
}
