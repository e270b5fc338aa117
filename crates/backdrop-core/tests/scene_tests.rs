// Host-side integration tests for the backdrop scene: mount, per-frame update,
// draw packing and teardown.

use backdrop_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn viewport() -> Viewport {
    Viewport::new(1280.0, 720.0, 1.0)
}

fn mount(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    Scene::mount(SceneParams::default(), viewport(), &mut rng).expect("mount")
}

#[test]
fn default_mount_builds_the_portfolio_scene() {
    let scene = mount(42);
    let sizes: Vec<usize> = scene.groups().iter().map(|g| g.len()).collect();
    assert_eq!(sizes, vec![200, 100, 80, 60]);
    assert_eq!(scene.shapes().len(), 15);
    assert_eq!(scene.streams().len(), 5);
    // 4 groups x (geometry + material), 5 shared primitives, 15 shape
    // materials, 5 streams x (geometry + material)
    assert_eq!(scene.assets().live(), 8 + 5 + 15 + 10);
}

#[test]
fn particles_stay_within_bound_after_many_frames() {
    let mut scene = mount(7);
    let b = scene.params().bound;
    for _ in 0..5_000 {
        scene.advance();
    }
    for g in 0..scene.groups().len() {
        for p in scene.group_positions(g).unwrap() {
            for c in p.to_array() {
                assert!((-b..=b).contains(&c), "coordinate {c} escaped [-{b}, {b}]");
            }
        }
    }
}

#[test]
fn fast_particles_wrap_with_a_small_custom_bound() {
    let params = SceneParams {
        bound: 1.0,
        groups: vec![ParticleGroupSpec {
            color: 0xffffff,
            count: 500,
            speed: 0.8,
        }],
        shape_count: 0,
        stream_count: 0,
        ..SceneParams::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let mut scene = Scene::mount(params, viewport(), &mut rng).unwrap();
    for _ in 0..200 {
        scene.advance();
        for p in scene.group_positions(0).unwrap() {
            assert!(p.abs().max_element() <= 1.0);
        }
    }
}

#[test]
fn wrap_is_a_hard_reset_to_the_opposite_face() {
    assert_eq!(wrap_coord(15.001, 15.0), -15.0);
    assert_eq!(wrap_coord(-15.001, 15.0), 15.0);
    assert_eq!(wrap_coord(15.0, 15.0), 15.0);
    assert_eq!(wrap_coord(-3.5, 15.0), -3.5);
}

#[test]
fn initial_positions_are_uniform_in_the_bound_cube() {
    let params = SceneParams {
        groups: vec![ParticleGroupSpec {
            color: 0xff0040,
            count: 30_000,
            speed: 0.01,
        }],
        shape_count: 0,
        stream_count: 0,
        ..SceneParams::default()
    };
    let b = params.bound;
    let mut rng = StdRng::seed_from_u64(2024);
    let scene = Scene::mount(params, viewport(), &mut rng).unwrap();
    let positions = scene.group_positions(0).unwrap();
    let n = positions.len() as f32;

    for axis in 0..3 {
        let values: Vec<f32> = positions.iter().map(|p| p[axis]).collect();
        let mean = values.iter().sum::<f32>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
        assert!(mean.abs() < 0.3, "axis {axis} mean {mean}");
        // Uniform on [-B, B] has variance B^2 / 3.
        let expected = b * b / 3.0;
        assert!((var - expected).abs() / expected < 0.05, "axis {axis} variance {var}");

        let mut bins = [0usize; 10];
        for v in &values {
            let i = (((v + b) / (2.0 * b)) * 10.0) as usize;
            bins[i.min(9)] += 1;
        }
        let per_bin = n / 10.0;
        for (i, count) in bins.iter().enumerate() {
            let dev = (*count as f32 - per_bin).abs() / per_bin;
            assert!(dev < 0.1, "axis {axis} bin {i} has {count}");
        }
    }
}

#[test]
fn clock_advances_by_the_fixed_step_and_never_resets() {
    let mut scene = mount(1);
    assert_eq!(scene.clock().time(), 0.0);
    let step = scene.clock().step();
    let mut prev = scene.clock().time();
    for i in 1..=1_000u64 {
        scene.advance();
        let t = scene.clock().time();
        assert!(t > prev, "clock did not increase at frame {i}");
        assert!((t - prev - step as f64).abs() < 1e-9);
        assert_eq!(scene.clock().frames(), i);
        prev = t;
    }
    assert!((prev - 10.0).abs() < 1e-2);
}

#[test]
fn clock_keeps_its_step_over_a_multi_day_mount() {
    let mut clock = SceneClock::new(0.01);
    let step = clock.step() as f64;
    let mut prev = clock.time();
    // Well past the point where an f32 accumulator stops moving (t = 262144).
    for i in 1..=26_500_000u64 {
        let t = clock.advance();
        let delta = t - prev;
        assert!(delta > 0.0, "clock stalled at frame {i}");
        assert!((delta - step).abs() < 1e-6, "step {delta} at frame {i}");
        prev = t;
    }
    assert!((prev - 265_000.0).abs() < 1.0);
}

#[test]
fn one_frame_moves_each_point_by_exactly_its_velocity() {
    let params = SceneParams {
        bound: 15.0,
        groups: vec![ParticleGroupSpec {
            color: 0xff0040,
            count: 200,
            speed: 0.01,
        }],
        ..SceneParams::default()
    };
    let mut rng = StdRng::seed_from_u64(99);
    let mut scene = Scene::mount(params, viewport(), &mut rng).unwrap();
    let before = scene.group_positions(0).unwrap().to_vec();
    let velocities = scene.groups()[0].velocities().to_vec();

    scene.advance();
    let after = scene.group_positions(0).unwrap();

    let mut checked = 0;
    for ((a, b), v) in after.iter().zip(&before).zip(&velocities) {
        let expected = *b + *v;
        if expected.abs().max_element() > 15.0 {
            continue; // wrapped this frame
        }
        assert_eq!(*a, expected);
        checked += 1;
    }
    assert!(checked > 190);
    for v in &velocities {
        assert!(v.abs().max_element() <= 0.005);
    }
}

#[test]
fn same_seed_gives_the_same_scene() {
    let mut a = mount(1234);
    let mut b = mount(1234);
    for _ in 0..50 {
        a.advance();
        b.advance();
    }
    for g in 0..a.groups().len() {
        assert_eq!(a.group_positions(g), b.group_positions(g));
    }
    for (sa, sb) in a.shapes().iter().zip(b.shapes()) {
        assert_eq!(sa.kind, sb.kind);
        assert_eq!(sa.position, sb.position);
        assert_eq!(sa.rotation, sb.rotation);
    }

    let c = mount(4321);
    assert_ne!(a.group_positions(0).unwrap()[0], c.group_positions(0).unwrap()[0]);
}

#[test]
fn stream_opacity_follows_the_pulse() {
    let mut scene = mount(5);
    for _ in 0..300 {
        scene.advance();
        let t = scene.clock().time();
        for i in 0..scene.streams().len() {
            let o = scene.stream_opacity(i).unwrap();
            assert!((o - stream_opacity(t, i)).abs() < 1e-6);
            assert!((-1e-6..=0.4 + 1e-6).contains(&o));
        }
    }
}

#[test]
fn stream_opacity_is_periodic_and_bounded() {
    let period = std::f64::consts::PI;
    for i in 0..5 {
        for k in 0..2_000 {
            let t = k as f64 * 0.037;
            let o = stream_opacity(t, i);
            assert!((-1e-6..=0.4 + 1e-6).contains(&o), "opacity {o} at t={t}");
            assert!((o - stream_opacity(t + period, i)).abs() < 1e-4);
        }
    }
}

#[test]
fn shapes_bob_around_their_base_height_without_drifting() {
    let mut scene = mount(8);
    let amplitude = scene.params().bob_amplitude;
    for _ in 0..20_000 {
        scene.advance();
    }
    let t = scene.clock().time();
    for s in scene.shapes() {
        assert_eq!(s.position.x, s.base_position.x);
        assert_eq!(s.position.z, s.base_position.z);
        let dy = s.position.y - s.base_position.y;
        assert!(dy.abs() <= amplitude + 1e-5);
        assert!((dy - bob_offset(t, s.position.x, amplitude)).abs() < 1e-5);
    }
}

#[test]
fn shapes_accumulate_their_rotation_speed() {
    let mut scene = mount(9);
    for _ in 0..10 {
        scene.advance();
    }
    for s in scene.shapes() {
        assert!((s.rotation - s.rotation_speed * 10.0).abs().max_element() < 1e-5);
        assert!(s.rotation_speed.abs().max_element() <= 0.01);
        assert!(s.base_position.abs().max_element() <= 12.5);
    }
}

#[test]
fn shape_materials_cycle_through_the_palette() {
    let scene = mount(10);
    for (i, s) in scene.shapes().iter().enumerate() {
        let m = scene.assets().material(s.material).unwrap();
        assert!(m.wireframe);
        assert_eq!(m.opacity, 0.15);
        assert_eq!(m.color, backdrop_core::color::hex_to_linear(constants::PALETTE[i % 4]));
    }
}

#[test]
fn camera_sways_around_the_origin() {
    let mut scene = mount(11);
    for _ in 0..777 {
        scene.advance();
    }
    let t = scene.clock().time();
    let eye = scene.camera().eye;
    assert!((eye.x - (t * 0.1).sin() as f32 * 2.0).abs() < 1e-5);
    assert!((eye.y - (t * 0.15).cos() as f32).abs() < 1e-5);
    assert_eq!(eye.z, 12.0);
    assert_eq!(scene.camera().target, glam::Vec3::ZERO);
}

#[test]
fn advancing_flags_point_buffers_and_packing_clears_them() {
    let mut scene = mount(12);
    let mut draws = DrawLists::with_capacity(scene.capacity());
    scene.collect_draws(&mut draws);
    let needs_upload = |scene: &Scene| {
        scene.groups().iter().all(|g| {
            matches!(
                scene.assets().geometry(g.geometry),
                Some(Geometry::Points { needs_upload: true, .. })
            )
        })
    };
    assert!(!needs_upload(&scene));
    scene.advance();
    assert!(needs_upload(&scene));
    scene.collect_draws(&mut draws);
    assert!(!needs_upload(&scene));
}

#[test]
fn draw_lists_match_the_scene_capacity() {
    let mut scene = mount(13);
    let capacity = scene.capacity();
    assert_eq!(capacity.points, 440);

    let mut draws = DrawLists::with_capacity(capacity);
    for _ in 0..3 {
        scene.advance();
        scene.collect_draws(&mut draws);
        assert_eq!(draws.points.len(), capacity.points);
        assert_eq!(draws.lines.len(), capacity.line_vertices);
    }
    // 5 streams of 20 points -> 19 segments each
    let stream_vertices = 5 * 19 * 2;
    assert!(capacity.line_vertices > stream_vertices);
    assert_eq!(draws.lines.len() % 2, 0);
}

#[test]
fn packed_points_are_the_rotated_group_positions() {
    let mut scene = mount(14);
    for _ in 0..100 {
        scene.advance();
    }
    let mut draws = DrawLists::default();
    scene.collect_draws(&mut draws);
    let group = &scene.groups()[0];
    let r = group.rotation;
    let q = glam::Quat::from_euler(glam::EulerRot::XYZ, r.x, r.y, r.z);
    let local = scene.group_positions(0).unwrap();
    for (packed, p) in draws.points.iter().zip(local) {
        let expected = q * *p;
        assert!((glam::Vec3::from(packed.pos) - expected).length() < 1e-4);
        assert_eq!(packed.size, 0.05);
        assert_eq!(packed.color[3], 0.8);
        // Rotation about the origin preserves distance.
        assert!((expected.length() - p.length()).abs() < 1e-3);
    }
}

#[test]
fn resize_tracks_the_latest_viewport() {
    let mut scene = mount(15);
    let sizes = [
        (800.0, 600.0, 1.0),
        (1920.0, 1080.0, 3.0),
        (375.0, 812.0, 2.0),
        (1024.0, 0.0, 1.0),
    ];
    for (w, h, dpr) in sizes {
        let before = scene.group_positions(0).unwrap().to_vec();
        let vp = Viewport::new(w, h, dpr);
        scene.resize(vp);
        assert_eq!(scene.viewport(), vp);
        assert_eq!(scene.camera().aspect, vp.aspect());
        assert_eq!(scene.viewport().surface_size(), vp.surface_size());
        assert_eq!(scene.group_positions(0).unwrap(), &before[..]);
    }
    assert_eq!(scene.viewport().surface_size(), (1024, 1));
    assert_eq!(scene.camera().aspect, 1024.0);
}

#[test]
fn mount_advance_teardown_leaves_nothing_live() {
    let mut scene = mount(16);
    let allocated = scene.assets().live();
    for _ in 0..100 {
        scene.advance();
    }
    let report = scene.teardown();
    assert_eq!(report.frames, 100);
    assert_eq!(report.release_errors, 0);
    assert_eq!(report.assets.allocated, allocated);
    assert_eq!(report.assets.released, allocated);
    assert_eq!(report.assets.live, 0);
}

#[test]
fn failed_mount_rolls_back_partial_allocations() {
    let mut rng = StdRng::seed_from_u64(17);
    let err = Scene::mount_in(
        SceneParams::default(),
        viewport(),
        AssetArena::with_limit(11),
        &mut rng,
    )
    .err()
    .expect("mount should fail under the limit");
    match err {
        BackdropError::Allocation { source, counts } => {
            assert_eq!(source, AssetError::LimitReached { limit: 11 });
            assert_eq!(counts.allocated, 11);
            assert_eq!(counts.released, 11);
            assert_eq!(counts.live, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_params_are_rejected_before_allocating() {
    let mut rng = StdRng::seed_from_u64(18);
    let bad = [
        SceneParams {
            bound: 0.0,
            ..SceneParams::default()
        },
        SceneParams {
            time_step: -0.01,
            ..SceneParams::default()
        },
        SceneParams {
            palette: Vec::new(),
            ..SceneParams::default()
        },
        SceneParams {
            bound: f32::MAX,
            ..SceneParams::default()
        },
        SceneParams {
            bound: f32::NAN,
            ..SceneParams::default()
        },
        SceneParams {
            shape_half_extent: f32::INFINITY,
            ..SceneParams::default()
        },
        SceneParams {
            stream_half_extent: f32::MAX,
            ..SceneParams::default()
        },
        SceneParams {
            shape_rotation_speed_max: f32::INFINITY,
            ..SceneParams::default()
        },
        SceneParams {
            groups: vec![ParticleGroupSpec {
                color: 0xffffff,
                count: 1,
                speed: f32::MAX,
            }],
            ..SceneParams::default()
        },
    ];
    for params in bad {
        let err = Scene::mount(params, viewport(), &mut rng).err().unwrap();
        assert!(matches!(err, BackdropError::InvalidParams(_)));
    }
}

#[test]
fn empty_scene_mounts_and_tears_down() {
    let params = SceneParams {
        groups: Vec::new(),
        shape_count: 0,
        stream_count: 0,
        ..SceneParams::default()
    };
    let mut rng = StdRng::seed_from_u64(19);
    let mut scene = Scene::mount(params, viewport(), &mut rng).unwrap();
    scene.advance();
    let mut draws = DrawLists::default();
    scene.collect_draws(&mut draws);
    assert!(draws.points.is_empty() && draws.lines.is_empty());
    let report = scene.teardown();
    assert_eq!(report.assets, AssetCounts::default());
}
