//! GPU-ready records packed from the scene once per frame.

/// One camera-facing particle sprite.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub pos: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

/// One end of a line segment (line-list topology).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub pos: [f32; 3],
    pub color: [f32; 4],
}

/// Reusable per-frame draw buffers.
#[derive(Default)]
pub struct DrawLists {
    pub points: Vec<PointInstance>,
    pub lines: Vec<LineVertex>,
}

impl DrawLists {
    pub fn with_capacity(capacity: DrawCapacity) -> Self {
        Self {
            points: Vec::with_capacity(capacity.points),
            lines: Vec::with_capacity(capacity.line_vertices),
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lines.clear();
    }
}

/// Upper bound on what a scene packs per frame; fixed for its lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawCapacity {
    pub points: usize,
    pub line_vertices: usize,
}
