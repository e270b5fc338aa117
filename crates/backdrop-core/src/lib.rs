pub mod assets;
pub mod camera;
pub mod clock;
pub mod color;
pub mod constants;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod params;
pub mod particles;
pub mod scene;
pub mod shapes;
pub mod streams;

pub use assets::*;
pub use camera::*;
pub use clock::*;
pub use draw::*;
pub use error::*;
pub use geometry::*;
pub use params::*;
pub use particles::*;
pub use scene::*;
pub use shapes::*;
pub use streams::*;

// Shaders bundled as string constants
pub static BACKDROP_WGSL: &str = include_str!("../shaders/backdrop.wgsl");
