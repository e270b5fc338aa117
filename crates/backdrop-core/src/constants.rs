// Shared tuning constants for the backdrop scene, used by every front-end.

// Simulation
pub const TIME_STEP: f32 = 0.01; // scene clock increment per frame
pub const PARTICLE_BOUND: f32 = 15.0; // half-width of the particle wrap cube

// Spawn extents (half-widths of the cubes entities start in)
pub const SHAPE_SPAWN_HALF_EXTENT: f32 = 12.5;
pub const STREAM_SPAWN_HALF_EXTENT: f32 = 10.0;

// Particle groups: (hex colour, point count, speed)
pub const PARTICLE_GROUPS: [(u32, usize, f32); 4] = [
    (0xff0040, 200, 0.010), // crimson
    (0x00d4ff, 100, 0.008), // electric blue
    (0x8000ff, 80, 0.006),  // electric purple
    (0x00ff80, 60, 0.012),  // electric green
];
pub const PARTICLE_SIZE: f32 = 0.05;
pub const PARTICLE_OPACITY: f32 = 0.8;

// Per-frame group spin, multiplied by (group index + 1)
pub const GROUP_SPIN_X: f32 = 0.0005;
pub const GROUP_SPIN_Y: f32 = 0.001;

// Floating shapes
pub const SHAPE_COUNT: usize = 15;
pub const SHAPE_OPACITY: f32 = 0.15;
pub const SHAPE_ROTATION_SPEED_MAX: f32 = 0.01; // per axis, radians per frame
pub const BOB_AMPLITUDE: f32 = 0.2; // vertical swing around the base position

// Wireframe palette, cycled by shape index
pub const PALETTE: [u32; 4] = [0xff0040, 0x00d4ff, 0x8000ff, 0x00ff80];

// Data streams
pub const STREAM_COUNT: usize = 5;
pub const STREAM_POINTS: usize = 20;
pub const STREAM_COLOR: u32 = 0xff0040;
pub const STREAM_OPACITY_BASE: f32 = 0.2;
pub const STREAM_OPACITY_SWING: f32 = 0.2;
pub const STREAM_SPIN_X: f32 = 0.002;
pub const STREAM_SPIN_Y: f32 = 0.001;

// Camera
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 12.0;
pub const CAMERA_SWAY_X: f32 = 2.0; // x = sin(t * 0.1) * 2
pub const CAMERA_SWAY_Y: f32 = 1.0; // y = cos(t * 0.15) * 1
pub const CAMERA_FREQ_X: f32 = 0.1;
pub const CAMERA_FREQ_Y: f32 = 0.15;

// Surface
pub const MAX_PIXEL_RATIO: f64 = 2.0;
