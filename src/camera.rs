use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::math::{Ray, AABB};

pub const DEFAULT_FOV_DEGREES: f32 = 70.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Perspective camera oriented by yaw and pitch, yaw 0 looking down +Z
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view, radians
    pub fov_y: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: 0.0,
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    /// Forward direction flattened onto the ground plane
    pub fn heading(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, NEAR_PLANE, FAR_PLANE)
    }

    /// Ray through pixel (`x`, `y`) of a `width`×`height` viewport
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        Ray::from_screen(x, y, width, height, self.view_matrix(), self.projection_matrix())
    }

    /// Pixel position of `point`, `None` when it lies behind the camera
    pub fn project_to_screen(&self, point: Vec3, width: f32, height: f32) -> Option<Vec2> {
        let clip = self.projection_matrix() * self.view_matrix() * Vec4::from((point, 1.0));
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }

    /// On-screen pixel extent of `bounds`, from its projected corners
    pub fn projected_size(&self, bounds: &AABB, width: f32, height: f32) -> Option<Vec2> {
        let (min, max) = (bounds.min, bounds.max);
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ];

        let projected: Vec<Vec2> = corners
            .iter()
            .filter_map(|&c| self.project_to_screen(c, width, height))
            .collect();
        let first = *projected.first()?;
        let (lo, hi) = projected
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Some(hi - lo)
    }
}
