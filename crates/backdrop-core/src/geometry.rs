//! Wireframe edge lists for the small primitives that float around the scene.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cone,
    Octahedron,
    Tetrahedron,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Box,
        ShapeKind::Sphere,
        ShapeKind::Cone,
        ShapeKind::Octahedron,
        ShapeKind::Tetrahedron,
    ];

    /// Model-space edges, centred on the origin.
    pub fn wire_segments(self) -> Vec<[Vec3; 2]> {
        match self {
            ShapeKind::Box => box_edges(0.8),
            ShapeKind::Sphere => sphere_edges(0.5, 12, 12),
            ShapeKind::Cone => cone_edges(0.4, 1.0, 8),
            ShapeKind::Octahedron => octahedron_edges(0.6),
            ShapeKind::Tetrahedron => tetrahedron_edges(0.7),
        }
    }
}

pub fn box_edges(size: f32) -> Vec<[Vec3; 2]> {
    let h = size * 0.5;
    let corner = |i: usize| {
        Vec3::new(
            if i & 1 == 0 { -h } else { h },
            if i & 2 == 0 { -h } else { h },
            if i & 4 == 0 { -h } else { h },
        )
    };
    // Corners differing in exactly one bit share an edge.
    let mut edges = Vec::with_capacity(12);
    for a in 0..8 {
        for bit in [1, 2, 4] {
            let b = a | bit;
            if b != a {
                edges.push([corner(a), corner(b)]);
            }
        }
    }
    edges
}

/// Latitude rings plus meridians.
pub fn sphere_edges(radius: f32, width_segments: usize, height_segments: usize) -> Vec<[Vec3; 2]> {
    let point = |u: usize, v: usize| {
        let phi = u as f32 / width_segments as f32 * TAU;
        let theta = v as f32 / height_segments as f32 * PI;
        Vec3::new(
            -radius * phi.cos() * theta.sin(),
            radius * theta.cos(),
            radius * phi.sin() * theta.sin(),
        )
    };
    let mut edges = Vec::new();
    for v in 1..height_segments {
        for u in 0..width_segments {
            edges.push([point(u, v), point(u + 1, v)]);
        }
    }
    for u in 0..width_segments {
        for v in 0..height_segments {
            edges.push([point(u, v), point(u, v + 1)]);
        }
    }
    edges
}

pub fn cone_edges(radius: f32, height: f32, radial_segments: usize) -> Vec<[Vec3; 2]> {
    let apex = Vec3::new(0.0, height * 0.5, 0.0);
    let rim = |i: usize| {
        let a = i as f32 / radial_segments as f32 * TAU;
        Vec3::new(radius * a.sin(), -height * 0.5, radius * a.cos())
    };
    let mut edges = Vec::with_capacity(radial_segments * 2);
    for i in 0..radial_segments {
        edges.push([rim(i), rim(i + 1)]);
        edges.push([rim(i), apex]);
    }
    edges
}

pub fn octahedron_edges(radius: f32) -> Vec<[Vec3; 2]> {
    let axes = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    let mut edges = Vec::with_capacity(12);
    for (i, a) in axes.iter().enumerate() {
        for b in &axes[i + 1..] {
            // Every pair of vertices except opposite poles is an edge.
            if a.dot(*b) == 0.0 {
                edges.push([*a * radius, *b * radius]);
            }
        }
    }
    edges
}

pub fn tetrahedron_edges(radius: f32) -> Vec<[Vec3; 2]> {
    let verts = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .map(|v| v.normalize() * radius);
    let mut edges = Vec::with_capacity(6);
    for i in 0..verts.len() {
        for j in i + 1..verts.len() {
            edges.push([verts[i], verts[j]]);
        }
    }
    edges
}
