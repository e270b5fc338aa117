//! Camera and viewport types shared by the web and native front-ends.
//!
//! Nothing here touches a platform API; front-ends feed in viewport sizes and
//! read back matrices.

use crate::constants::*;
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Slow sway around the origin; z stays fixed and the camera keeps looking
    /// at the centre of the scene.
    pub fn sway(&mut self, time: f64) {
        self.eye.x = (time * CAMERA_FREQ_X as f64).sin() as f32 * CAMERA_SWAY_X;
        self.eye.y = (time * CAMERA_FREQ_Y as f64).cos() as f32 * CAMERA_SWAY_Y;
        self.target = Vec3::ZERO;
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view_matrix().to_cols_array_2d(),
            proj: self.projection_matrix().to_cols_array_2d(),
        }
    }
}

/// View and projection matrices as laid out in the shader's uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

/// Host viewport in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        Self {
            css_width,
            css_height,
            pixel_ratio,
        }
    }

    /// Backing-store size of the drawing surface; the pixel ratio is capped
    /// at 2 and each side is at least one pixel.
    pub fn surface_size(&self) -> (u32, u32) {
        let dpr = if self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0 {
            self.pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };
        let px = |css: f64| ((css.max(0.0) * dpr) as u32).max(1);
        (px(self.css_width), px(self.css_height))
    }

    /// Projection aspect ratio of the CSS box; a zero height reads as one.
    pub fn aspect(&self) -> f32 {
        (self.css_width.max(1.0) / self.css_height.max(1.0)) as f32
    }
}
