// Host-side sanity checks for tuning constants and packed record layouts.

use backdrop_core::color::{hex_to_linear, srgb_to_linear};
use backdrop_core::constants::*;
use backdrop_core::{LineVertex, PointInstance};

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(TIME_STEP > 0.0);
    assert!(PARTICLE_BOUND > 0.0);
    // Shapes and streams spawn inside the particle cube.
    assert!(SHAPE_SPAWN_HALF_EXTENT < PARTICLE_BOUND);
    assert!(STREAM_SPAWN_HALF_EXTENT < PARTICLE_BOUND);
    assert!(PARTICLE_OPACITY > 0.0 && PARTICLE_OPACITY <= 1.0);
    assert!(SHAPE_OPACITY > 0.0 && SHAPE_OPACITY <= 1.0);
    // Stream pulse never goes negative or above one.
    assert!(STREAM_OPACITY_BASE - STREAM_OPACITY_SWING >= 0.0);
    assert!(STREAM_OPACITY_BASE + STREAM_OPACITY_SWING <= 1.0);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZFAR > CAMERA_ZNEAR);
    assert!(MAX_PIXEL_RATIO >= 1.0);
}

#[test]
fn particle_groups_match_the_portfolio_palette() {
    let colors: Vec<u32> = PARTICLE_GROUPS.iter().map(|g| g.0).collect();
    assert_eq!(colors, PALETTE.to_vec());
    let total: usize = PARTICLE_GROUPS.iter().map(|g| g.1).sum();
    assert_eq!(total, 440);
}

#[test]
fn hex_colours_decode_to_linear() {
    for c in hex_to_linear(0xffffff) {
        assert!((c - 1.0).abs() < 1e-6);
    }
    assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
    let crimson = hex_to_linear(0xff0040);
    assert!((crimson[0] - 1.0).abs() < 1e-6);
    assert_eq!(crimson[1], 0.0);
    assert!((crimson[2] - srgb_to_linear(64.0 / 255.0)).abs() < 1e-7);
    assert!(crimson[2] < 64.0 / 255.0);
}

#[test]
fn packed_records_have_gpu_friendly_sizes() {
    assert_eq!(std::mem::size_of::<PointInstance>(), 32);
    assert_eq!(std::mem::size_of::<LineVertex>(), 28);
}

#[test]
fn bundled_shader_exposes_both_pipelines() {
    for entry in ["fn vs_points", "fn fs_points", "fn vs_lines", "fn fs_lines"] {
        assert!(
            backdrop_core::BACKDROP_WGSL.contains(entry),
            "missing {entry}"
        );
    }
}
