//! Handle-based ownership of every geometry and material in a scene.
//!
//! Entities never hold references into the arena, only copyable handles. A
//! handle can be released exactly once; the arena keeps running totals so a
//! teardown can be checked for leaks.

use glam::Vec3;

/// Errors raised by [`AssetArena`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("asset limit reached ({limit} live assets)")]
    LimitReached { limit: usize },
    #[error("{kind} #{index} was already released")]
    AlreadyReleased { kind: &'static str, index: u32 },
    #[error("{kind} #{index} does not exist")]
    Unknown { kind: &'static str, index: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(u32);

impl GeometryHandle {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl MaterialHandle {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Vertex data owned by the arena.
#[derive(Clone, Debug)]
pub enum Geometry {
    /// Point cloud whose positions are rewritten every frame.
    Points {
        positions: Vec<Vec3>,
        needs_upload: bool,
    },
    /// Edge list in model space.
    Wire { segments: Vec<[Vec3; 2]> },
    /// Open polyline in model space.
    Polyline { points: Vec<Vec3> },
}

impl Geometry {
    pub fn points(positions: Vec<Vec3>) -> Self {
        Geometry::Points {
            positions,
            needs_upload: true,
        }
    }

    /// Number of line segments this geometry contributes when drawn as lines.
    pub fn segment_count(&self) -> usize {
        match self {
            Geometry::Points { .. } => 0,
            Geometry::Wire { segments } => segments.len(),
            Geometry::Polyline { points } => points.len().saturating_sub(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Additive,
    Alpha,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    /// Point size in world units; ignored for line materials.
    pub size: f32,
    pub blend: Blend,
    pub wireframe: bool,
}

impl Material {
    pub fn rgba(&self) -> [f32; 4] {
        [self.color[0], self.color[1], self.color[2], self.opacity]
    }
}

/// Totals reported when a scene is torn down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssetCounts {
    pub allocated: usize,
    pub released: usize,
    pub live: usize,
}

#[derive(Default)]
pub struct AssetArena {
    geometries: Vec<Option<Geometry>>,
    materials: Vec<Option<Material>>,
    limit: Option<usize>,
    allocated: usize,
    released: usize,
}

impl AssetArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena that refuses to hold more than `limit` live assets at once.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn reserve(&mut self) -> Result<(), AssetError> {
        if let Some(limit) = self.limit {
            if self.live() >= limit {
                return Err(AssetError::LimitReached { limit });
            }
        }
        self.allocated += 1;
        Ok(())
    }

    pub fn insert_geometry(&mut self, geometry: Geometry) -> Result<GeometryHandle, AssetError> {
        self.reserve()?;
        self.geometries.push(Some(geometry));
        Ok(GeometryHandle(self.geometries.len() as u32 - 1))
    }

    pub fn insert_material(&mut self, material: Material) -> Result<MaterialHandle, AssetError> {
        self.reserve()?;
        self.materials.push(Some(material));
        Ok(MaterialHandle(self.materials.len() as u32 - 1))
    }

    pub fn geometry(&self, h: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(h.0 as usize).and_then(Option::as_ref)
    }

    pub fn geometry_mut(&mut self, h: GeometryHandle) -> Option<&mut Geometry> {
        self.geometries.get_mut(h.0 as usize).and_then(Option::as_mut)
    }

    pub fn material(&self, h: MaterialHandle) -> Option<&Material> {
        self.materials.get(h.0 as usize).and_then(Option::as_ref)
    }

    pub fn material_mut(&mut self, h: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(h.0 as usize).and_then(Option::as_mut)
    }

    pub fn release_geometry(&mut self, h: GeometryHandle) -> Result<(), AssetError> {
        release_slot(&mut self.geometries, h.0, "geometry")?;
        self.released += 1;
        Ok(())
    }

    pub fn release_material(&mut self, h: MaterialHandle) -> Result<(), AssetError> {
        release_slot(&mut self.materials, h.0, "material")?;
        self.released += 1;
        Ok(())
    }

    /// Release every live asset regardless of who holds its handle; returns
    /// how many were released.
    pub fn release_all(&mut self) -> usize {
        let n = self.geometries.iter_mut().filter_map(Option::take).count()
            + self.materials.iter_mut().filter_map(Option::take).count();
        self.released += n;
        n
    }

    pub fn live(&self) -> usize {
        self.allocated - self.released
    }

    pub fn counts(&self) -> AssetCounts {
        AssetCounts {
            allocated: self.allocated,
            released: self.released,
            live: self.live(),
        }
    }
}

fn release_slot<T>(slots: &mut [Option<T>], index: u32, kind: &'static str) -> Result<(), AssetError> {
    match slots.get_mut(index as usize) {
        None => Err(AssetError::Unknown { kind, index }),
        Some(slot) => match slot.take() {
            Some(_) => Ok(()),
            None => Err(AssetError::AlreadyReleased { kind, index }),
        },
    }
}
