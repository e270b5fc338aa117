//! wgpu renderer for the backdrop, shared by the web and native front-ends.
//!
//! The renderer owns the surface, device and every buffer. It knows nothing
//! about the scene beyond the packed records in `backdrop_core::DrawLists`.

mod error;
mod pipelines;
mod renderer;

pub use error::RenderError;
pub use renderer::{Renderer, SurfaceStatus};
