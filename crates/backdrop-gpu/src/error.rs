/// Reasons the drawing surface could not be brought up.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no GPU adapter compatible with the surface")]
    NoAdapter,
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("request_device error: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("create_surface error: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
}
