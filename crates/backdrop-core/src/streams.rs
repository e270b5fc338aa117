use crate::assets::{AssetArena, AssetError, Blend, Geometry, GeometryHandle, Material, MaterialHandle};
use crate::color::hex_to_linear;
use crate::constants::{STREAM_OPACITY_BASE, STREAM_OPACITY_SWING, STREAM_SPIN_X, STREAM_SPIN_Y};
use glam::Vec3;
use rand::Rng;

// Opacity a stream shows before its first frame.
const INITIAL_OPACITY: f32 = 0.3;

/// A fixed random polyline that tumbles and pulses.
#[derive(Clone, Debug)]
pub struct DataStream {
    pub index: usize,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub rotation: Vec3,
    spin: Vec3,
}

impl DataStream {
    pub fn spawn<R: Rng + ?Sized>(
        index: usize,
        point_count: usize,
        half_extent: f32,
        color: u32,
        assets: &mut AssetArena,
        rng: &mut R,
    ) -> Result<Self, AssetError> {
        let e = half_extent;
        let points = (0..point_count)
            .map(|_| Vec3::new(rng.gen_range(-e..e), rng.gen_range(-e..e), rng.gen_range(-e..e)))
            .collect();
        let geometry = assets.insert_geometry(Geometry::Polyline { points })?;
        let material = assets.insert_material(Material {
            color: hex_to_linear(color),
            opacity: INITIAL_OPACITY,
            size: 0.0,
            blend: Blend::Alpha,
            wireframe: false,
        })?;
        let k = (index + 1) as f32;
        Ok(Self {
            index,
            geometry,
            material,
            rotation: Vec3::ZERO,
            spin: Vec3::new(STREAM_SPIN_X * k, STREAM_SPIN_Y * k, 0.0),
        })
    }

    pub fn step(&mut self, time: f64, assets: &mut AssetArena) {
        self.rotation += self.spin;
        if let Some(m) = assets.material_mut(self.material) {
            m.opacity = stream_opacity(time, self.index);
        }
    }
}

/// Pulse in `[0.0, 0.4]` with period π.
#[inline]
pub fn stream_opacity(time: f64, index: usize) -> f32 {
    STREAM_OPACITY_BASE + (time * 2.0 + index as f64).sin() as f32 * STREAM_OPACITY_SWING
}
