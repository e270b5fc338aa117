//! The mounted backdrop: owns every entity and asset, advances them once per
//! frame and packs them for the renderer.

use crate::assets::{AssetArena, AssetCounts, AssetError, Geometry, GeometryHandle};
use crate::camera::{Camera, CameraUniform, Viewport};
use crate::clock::SceneClock;
use crate::draw::{DrawCapacity, DrawLists, LineVertex, PointInstance};
use crate::error::BackdropError;
use crate::geometry::ShapeKind;
use crate::params::SceneParams;
use crate::particles::ParticleGroup;
use crate::shapes::{FloatingShape, ShapeSpawn};
use crate::streams::DataStream;
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;

/// What a teardown released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeardownReport {
    pub frames: u64,
    pub assets: AssetCounts,
    /// Releases that failed (double release or unknown handle).
    pub release_errors: usize,
}

pub struct Scene {
    params: SceneParams,
    clock: SceneClock,
    camera: Camera,
    viewport: Viewport,
    assets: AssetArena,
    groups: Vec<ParticleGroup>,
    shape_geometries: Vec<(ShapeKind, GeometryHandle)>,
    shapes: Vec<FloatingShape>,
    streams: Vec<DataStream>,
}

impl Scene {
    pub fn mount<R: Rng + ?Sized>(
        params: SceneParams,
        viewport: Viewport,
        rng: &mut R,
    ) -> Result<Self, BackdropError> {
        Self::mount_in(params, viewport, AssetArena::new(), rng)
    }

    /// Mount into a caller-supplied arena (e.g. one with an allocation limit).
    /// On failure everything allocated so far is released before returning.
    pub fn mount_in<R: Rng + ?Sized>(
        params: SceneParams,
        viewport: Viewport,
        assets: AssetArena,
        rng: &mut R,
    ) -> Result<Self, BackdropError> {
        params.validate()?;
        let mut scene = Self {
            clock: SceneClock::new(params.time_step),
            camera: Camera::new(viewport.aspect()),
            viewport,
            assets,
            groups: Vec::with_capacity(params.groups.len()),
            shape_geometries: Vec::new(),
            shapes: Vec::with_capacity(params.shape_count),
            streams: Vec::with_capacity(params.stream_count),
            params,
        };

        if let Err(source) = scene.populate(rng) {
            let released = scene.assets.release_all();
            log::warn!("[scene] mount aborted: {source}; released {released} assets");
            return Err(BackdropError::Allocation {
                source,
                counts: scene.assets.counts(),
            });
        }

        log::info!(
            "[scene] mounted groups={} particles={} shapes={} streams={} assets={}",
            scene.groups.len(),
            scene.params.particle_count(),
            scene.shapes.len(),
            scene.streams.len(),
            scene.assets.live()
        );
        Ok(scene)
    }

    fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), AssetError> {
        let p = &self.params;
        for (i, spec) in p.groups.iter().enumerate() {
            let group = ParticleGroup::spawn(
                spec,
                i,
                p.bound,
                p.particle_size,
                p.particle_opacity,
                &mut self.assets,
                rng,
            )?;
            self.groups.push(group);
        }

        if p.shape_count > 0 {
            for kind in ShapeKind::ALL {
                let h = self.assets.insert_geometry(Geometry::Wire {
                    segments: kind.wire_segments(),
                })?;
                self.shape_geometries.push((kind, h));
            }
            let spawn = ShapeSpawn {
                half_extent: p.shape_half_extent,
                rotation_speed_max: p.shape_rotation_speed_max,
                opacity: p.shape_opacity,
            };
            for i in 0..p.shape_count {
                let shape = FloatingShape::spawn(
                    i,
                    &self.shape_geometries,
                    &p.palette,
                    spawn,
                    &mut self.assets,
                    rng,
                )?;
                self.shapes.push(shape);
            }
        }

        for i in 0..p.stream_count {
            let stream = DataStream::spawn(
                i,
                p.stream_points,
                p.stream_half_extent,
                p.stream_color,
                &mut self.assets,
                rng,
            )?;
            self.streams.push(stream);
        }
        Ok(())
    }

    /// One frame of animation.
    pub fn advance(&mut self) {
        let time = self.clock.advance();
        let bound = self.params.bound;
        for group in &mut self.groups {
            group.step(&mut self.assets, bound);
        }
        for shape in &mut self.shapes {
            shape.step(time, self.params.bob_amplitude);
        }
        for stream in &mut self.streams {
            stream.step(time, &mut self.assets);
        }
        self.camera.sway(time);
    }

    /// Apply a new host viewport. Entity state is untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    pub fn capacity(&self) -> DrawCapacity {
        let segments = |h: GeometryHandle| self.assets.geometry(h).map_or(0, Geometry::segment_count);
        let line_vertices = self.shapes.iter().map(|s| segments(s.geometry)).sum::<usize>()
            + self.streams.iter().map(|s| segments(s.geometry)).sum::<usize>();
        DrawCapacity {
            points: self.params.particle_count(),
            line_vertices: line_vertices * 2,
        }
    }

    /// Pack the current frame into `out`, replacing its contents. Point
    /// geometries are marked as uploaded.
    pub fn collect_draws(&mut self, out: &mut DrawLists) {
        out.clear();

        for group in &self.groups {
            let Some(material) = self.assets.material(group.material) else {
                continue;
            };
            let color = material.rgba();
            let size = material.size;
            let rot = euler_quat(group.rotation);
            if let Some(Geometry::Points {
                positions,
                needs_upload,
            }) = self.assets.geometry_mut(group.geometry)
            {
                out.points.extend(positions.iter().map(|p| PointInstance {
                    pos: (rot * *p).to_array(),
                    size,
                    color,
                }));
                *needs_upload = false;
            }
        }

        for shape in &self.shapes {
            let model = Mat4::from_rotation_translation(euler_quat(shape.rotation), shape.position);
            self.push_lines(shape.geometry, shape.material, model, out);
        }
        for stream in &self.streams {
            let model = Mat4::from_quat(euler_quat(stream.rotation));
            self.push_lines(stream.geometry, stream.material, model, out);
        }
    }

    fn push_lines(
        &self,
        geometry: GeometryHandle,
        material: crate::assets::MaterialHandle,
        model: Mat4,
        out: &mut DrawLists,
    ) {
        let (Some(geometry), Some(material)) =
            (self.assets.geometry(geometry), self.assets.material(material))
        else {
            return;
        };
        let color = material.rgba();
        let mut push = |a: Vec3, b: Vec3| {
            out.lines.push(LineVertex {
                pos: model.transform_point3(a).to_array(),
                color,
            });
            out.lines.push(LineVertex {
                pos: model.transform_point3(b).to_array(),
                color,
            });
        };
        match geometry {
            Geometry::Wire { segments } => segments.iter().for_each(|[a, b]| push(*a, *b)),
            Geometry::Polyline { points } => points.windows(2).for_each(|w| push(w[0], w[1])),
            Geometry::Points { .. } => {}
        }
    }

    /// Release every geometry and material exactly once. Shared primitive
    /// geometries are released after the shapes that borrowed them.
    pub fn teardown(mut self) -> TeardownReport {
        let mut errors = Vec::new();
        let mut note = |r: Result<(), AssetError>| {
            if let Err(e) = r {
                errors.push(e);
            }
        };
        for group in &self.groups {
            note(self.assets.release_geometry(group.geometry));
            note(self.assets.release_material(group.material));
        }
        for shape in &self.shapes {
            note(self.assets.release_material(shape.material));
        }
        for (_, h) in &self.shape_geometries {
            note(self.assets.release_geometry(*h));
        }
        for stream in &self.streams {
            note(self.assets.release_geometry(stream.geometry));
            note(self.assets.release_material(stream.material));
        }

        for e in &errors {
            log::warn!("[scene] teardown: {e}");
        }
        let stray = self.assets.release_all();
        if stray > 0 {
            log::warn!("[scene] teardown released {stray} unowned assets");
        }

        let report = TeardownReport {
            frames: self.clock.frames(),
            assets: self.assets.counts(),
            release_errors: errors.len(),
        };
        log::info!(
            "[scene] teardown after {} frames: allocated={} released={} live={}",
            report.frames,
            report.assets.allocated,
            report.assets.released,
            report.assets.live
        );
        report
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        self.camera.uniform()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn clock(&self) -> &SceneClock {
        &self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn assets(&self) -> &AssetArena {
        &self.assets
    }

    pub fn groups(&self) -> &[ParticleGroup] {
        &self.groups
    }

    pub fn shapes(&self) -> &[FloatingShape] {
        &self.shapes
    }

    pub fn streams(&self) -> &[DataStream] {
        &self.streams
    }

    /// Model-space positions of one particle group.
    pub fn group_positions(&self, index: usize) -> Option<&[Vec3]> {
        let group = self.groups.get(index)?;
        match self.assets.geometry(group.geometry)? {
            Geometry::Points { positions, .. } => Some(positions),
            _ => None,
        }
    }

    pub fn stream_opacity(&self, index: usize) -> Option<f32> {
        let stream = self.streams.get(index)?;
        self.assets.material(stream.material).map(|m| m.opacity)
    }
}

#[inline]
fn euler_quat(r: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
}
