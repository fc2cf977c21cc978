use crate::{Mat4, Vec3};

/// Pixel rectangle of the render target (origin bottom-left, GL style).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.w.max(1) as f32 / self.h.max(1) as f32
    }
}

/// Orthographic camera looking straight down at the field (right-handed).
///
/// Eye sits on +Y above the origin with +Z as screen-up, so field length runs
/// along screen X and field width along screen Y.
#[derive(Clone, Copy, Debug)]
pub struct TopDownCamera {
    pub half_length: f32,
    pub half_width: f32,
    pub eye_height: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl TopDownCamera {
    pub fn for_field(field_width: f32, field_length: f32) -> Self {
        Self {
            half_length: field_length / 2.0,
            half_width: field_width / 2.0,
            eye_height: 4.0,
            z_near: 1.0,
            z_far: 5.0,
        }
    }

    /// OpenGL-style orthographic projection (z in [-1,1]).
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            -self.half_length,
            self.half_length,
            -self.half_width,
            self.half_width,
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, self.eye_height, 0.0), Vec3::ZERO, Vec3::Z)
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }
}
