use crate::constants::*;
use crate::error::BackdropError;
use crate::particles::ParticleGroupSpec;

/// Everything that shapes a mounted scene. `Default` reproduces the
/// portfolio look; tests shrink or stretch individual knobs.
#[derive(Clone, Debug)]
pub struct SceneParams {
    pub bound: f32,
    pub time_step: f32,
    pub groups: Vec<ParticleGroupSpec>,
    pub particle_size: f32,
    pub particle_opacity: f32,
    pub shape_count: usize,
    pub shape_half_extent: f32,
    pub shape_rotation_speed_max: f32,
    pub shape_opacity: f32,
    pub bob_amplitude: f32,
    pub palette: Vec<u32>,
    pub stream_count: usize,
    pub stream_points: usize,
    pub stream_half_extent: f32,
    pub stream_color: u32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            bound: PARTICLE_BOUND,
            time_step: TIME_STEP,
            groups: PARTICLE_GROUPS
                .iter()
                .map(|&(color, count, speed)| ParticleGroupSpec { color, count, speed })
                .collect(),
            particle_size: PARTICLE_SIZE,
            particle_opacity: PARTICLE_OPACITY,
            shape_count: SHAPE_COUNT,
            shape_half_extent: SHAPE_SPAWN_HALF_EXTENT,
            shape_rotation_speed_max: SHAPE_ROTATION_SPEED_MAX,
            shape_opacity: SHAPE_OPACITY,
            bob_amplitude: BOB_AMPLITUDE,
            palette: PALETTE.to_vec(),
            stream_count: STREAM_COUNT,
            stream_points: STREAM_POINTS,
            stream_half_extent: STREAM_SPAWN_HALF_EXTENT,
            stream_color: STREAM_COLOR,
        }
    }
}

impl SceneParams {
    /// Reject anything that would make a sampling range empty or infinite.
    /// Ranges span `[-x, x)`, so `2 * x` must stay finite as well.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if !spans_finite_range(self.bound) || self.bound <= 0.0 {
            return Err(BackdropError::InvalidParams("bound must be positive and finite"));
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(BackdropError::InvalidParams("time step must be positive and finite"));
        }
        if self
            .groups
            .iter()
            .any(|g| !spans_finite_range(g.speed) || g.speed < 0.0)
        {
            return Err(BackdropError::InvalidParams("group speed must be non-negative and finite"));
        }
        if self.shape_count > 0 {
            if self.palette.is_empty() {
                return Err(BackdropError::InvalidParams("shapes need a non-empty palette"));
            }
            if !spans_finite_range(self.shape_half_extent) || self.shape_half_extent <= 0.0 {
                return Err(BackdropError::InvalidParams("shape extent must be positive and finite"));
            }
            if !spans_finite_range(self.shape_rotation_speed_max) {
                return Err(BackdropError::InvalidParams("shape rotation speed must be finite"));
            }
        }
        if self.stream_count > 0
            && (!spans_finite_range(self.stream_half_extent) || self.stream_half_extent <= 0.0)
        {
            return Err(BackdropError::InvalidParams("stream extent must be positive and finite"));
        }
        Ok(())
    }

    pub fn particle_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}

#[inline]
fn spans_finite_range(x: f32) -> bool {
    (x * 2.0).is_finite()
}
