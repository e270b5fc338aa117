/// Monotonic scene time advanced by a fixed step once per frame.
///
/// Wall-clock time is not consulted; a slow frame only delays the next step.
/// Time is derived from the frame count in `f64`, so the step stays exact on
/// mounts that run for days.
#[derive(Clone, Debug)]
pub struct SceneClock {
    step: f32,
    frames: u64,
}

impl SceneClock {
    pub fn new(step: f32) -> Self {
        Self { step, frames: 0 }
    }

    pub fn advance(&mut self) -> f64 {
        self.frames += 1;
        self.time()
    }

    pub fn time(&self) -> f64 {
        self.frames as f64 * self.step as f64
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
