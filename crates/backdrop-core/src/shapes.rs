use crate::assets::{AssetArena, AssetError, Blend, GeometryHandle, Material, MaterialHandle};
use crate::color::hex_to_linear;
use crate::geometry::ShapeKind;
use glam::Vec3;
use rand::Rng;

/// A wireframe primitive that spins in place and bobs around its base height.
#[derive(Clone, Debug)]
pub struct FloatingShape {
    pub kind: ShapeKind,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub base_position: Vec3,
    pub position: Vec3,
    pub rotation: Vec3,
    pub rotation_speed: Vec3,
}

/// Placement ranges for a batch of shapes.
#[derive(Clone, Copy, Debug)]
pub struct ShapeSpawn {
    pub half_extent: f32,
    pub rotation_speed_max: f32,
    pub opacity: f32,
}

impl FloatingShape {
    /// `geometries` holds one shared geometry per entry of [`ShapeKind::ALL`].
    pub fn spawn<R: Rng + ?Sized>(
        index: usize,
        geometries: &[(ShapeKind, GeometryHandle)],
        palette: &[u32],
        spawn: ShapeSpawn,
        assets: &mut AssetArena,
        rng: &mut R,
    ) -> Result<Self, AssetError> {
        let (kind, geometry) = geometries[rng.gen_range(0..geometries.len())];
        let material = assets.insert_material(Material {
            color: hex_to_linear(palette[index % palette.len()]),
            opacity: spawn.opacity,
            size: 0.0,
            blend: Blend::Alpha,
            wireframe: true,
        })?;

        let e = spawn.half_extent;
        let base_position = Vec3::new(
            rng.gen_range(-e..e),
            rng.gen_range(-e..e),
            rng.gen_range(-e..e),
        );
        let s = spawn.rotation_speed_max;
        let rotation_speed = if s > 0.0 {
            Vec3::new(rng.gen_range(-s..s), rng.gen_range(-s..s), rng.gen_range(-s..s))
        } else {
            Vec3::ZERO
        };

        Ok(Self {
            kind,
            geometry,
            material,
            base_position,
            position: base_position,
            rotation: Vec3::ZERO,
            rotation_speed,
        })
    }

    pub fn step(&mut self, time: f64, bob_amplitude: f32) {
        self.rotation += self.rotation_speed;
        self.position.y = self.base_position.y + bob_offset(time, self.position.x, bob_amplitude);
    }
}

/// Vertical offset from the base height; absolute, so it never accumulates.
#[inline]
pub fn bob_offset(time: f64, x: f32, amplitude: f32) -> f32 {
    (time + x as f64).sin() as f32 * amplitude
}
