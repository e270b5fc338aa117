use crate::assets::{AssetArena, AssetError, Blend, Geometry, GeometryHandle, Material, MaterialHandle};
use crate::color::hex_to_linear;
use crate::constants::{GROUP_SPIN_X, GROUP_SPIN_Y};
use glam::Vec3;
use rand::Rng;

/// Colour, size and drift speed of one particle group.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleGroupSpec {
    pub color: u32,
    pub count: usize,
    pub speed: f32,
}

/// A point cloud drifting inside the wrap cube. Positions live in the arena
/// geometry; velocities stay fixed for the lifetime of the group.
#[derive(Clone, Debug)]
pub struct ParticleGroup {
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub rotation: Vec3,
    spin: Vec3,
    velocities: Vec<Vec3>,
}

impl ParticleGroup {
    pub fn spawn<R: Rng + ?Sized>(
        spec: &ParticleGroupSpec,
        index: usize,
        bound: f32,
        size: f32,
        opacity: f32,
        assets: &mut AssetArena,
        rng: &mut R,
    ) -> Result<Self, AssetError> {
        let half_speed = spec.speed * 0.5;
        let mut positions = Vec::with_capacity(spec.count);
        let mut velocities = Vec::with_capacity(spec.count);
        for _ in 0..spec.count {
            positions.push(Vec3::new(
                rng.gen_range(-bound..bound),
                rng.gen_range(-bound..bound),
                rng.gen_range(-bound..bound),
            ));
            velocities.push(if half_speed > 0.0 {
                Vec3::new(
                    rng.gen_range(-half_speed..half_speed),
                    rng.gen_range(-half_speed..half_speed),
                    rng.gen_range(-half_speed..half_speed),
                )
            } else {
                Vec3::ZERO
            });
        }

        let geometry = assets.insert_geometry(Geometry::points(positions))?;
        let material = assets.insert_material(Material {
            color: hex_to_linear(spec.color),
            opacity,
            size,
            blend: Blend::Additive,
            wireframe: false,
        })?;

        let k = (index + 1) as f32;
        Ok(Self {
            geometry,
            material,
            rotation: Vec3::ZERO,
            spin: Vec3::new(GROUP_SPIN_X * k, GROUP_SPIN_Y * k, 0.0),
            velocities,
        })
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn len(&self) -> usize {
        self.velocities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.velocities.is_empty()
    }

    /// Move every point by its velocity, wrap escaped coordinates to the
    /// opposite face, flag the buffer for upload, and spin the group.
    pub fn step(&mut self, assets: &mut AssetArena, bound: f32) {
        if let Some(Geometry::Points {
            positions,
            needs_upload,
        }) = assets.geometry_mut(self.geometry)
        {
            for (p, v) in positions.iter_mut().zip(&self.velocities) {
                let moved = *p + *v;
                *p = Vec3::new(
                    wrap_coord(moved.x, bound),
                    wrap_coord(moved.y, bound),
                    wrap_coord(moved.z, bound),
                );
            }
            *needs_upload = true;
        }
        self.rotation += self.spin;
    }
}

/// Hard reset to the opposite face, not a reflection.
#[inline]
pub fn wrap_coord(v: f32, bound: f32) -> f32 {
    if v > bound {
        -bound
    } else if v < -bound {
        bound
    } else {
        v
    }
}
