//! Orbit camera for the 3D viewport.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::ray::Ray;

/// Orbit camera.
///
/// The camera orbits a target point in a Y-up world; yaw sweeps around the
/// up axis and pitch tilts toward it. It doubles as the projector that maps
/// screen points to world rays for picking and drag-plane intersection.
pub struct Camera {
    /// Eye position, derived from the orbit parameters.
    pub position: Vec3,
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Up axis.
    pub up: Vec3,
    /// Vertical field of view, radians.
    pub fov: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Orbit angle around the up axis, radians.
    pub yaw: f32,
    /// Orbit tilt toward the up axis, radians.
    pub pitch: f32,
    /// Distance from the target.
    pub distance: f32,
}

impl Camera {
    /// Create a new camera with default parameters.
    pub fn new(aspect: f32) -> Self {
        let yaw = 45.0_f32.to_radians();
        let pitch = 30.0_f32.to_radians();
        let distance = 1.0;
        let target = Vec3::new(0.0, 0.1, 0.0);

        let mut camera = Self {
            position: Vec3::ZERO,
            target,
            up: Vec3::Y,
            fov: 40.0_f32.to_radians(),
            aspect,
            near: 0.01,
            far: 100.0,
            yaw,
            pitch,
            distance,
        };
        camera.update_position_from_orbit();
        camera
    }

    /// Update aspect ratio.
    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Orbit the camera around the target.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch =
            (self.pitch + delta_pitch).clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.update_position_from_orbit();
    }

    /// Pan the camera (move target).
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        let scale = self.distance * 0.002;
        self.target += right * (-delta_x * scale) + up * (delta_y * scale);
        self.update_position_from_orbit();
    }

    /// Zoom the camera.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.05, 100.0);
        self.update_position_from_orbit();
    }

    fn update_position_from_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.cos();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.sin();
        self.position = self.target + Vec3::new(x, y, z);
    }

    /// Fit camera to show the given bounding sphere.
    pub fn fit_all(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        self.distance = (radius * 2.5).max(0.1);
        self.update_position_from_orbit();
    }

    /// Get view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Convert screen coordinates to a world ray.
    pub fn screen_to_ray(
        &self,
        screen_x: f32,
        screen_y: f32,
        screen_width: f32,
        screen_height: f32,
    ) -> Ray {
        // Convert to normalized device coordinates
        let ndc_x = (2.0 * screen_x / screen_width) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_y / screen_height);

        let inv_proj = self.projection_matrix().inverse();
        let inv_view = self.view_matrix().inverse();

        // Near and far points in NDC
        let near_ndc = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far_ndc = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        // Transform to view space
        let near_view = inv_proj * near_ndc;
        let far_view = inv_proj * far_ndc;
        let near_view = near_view.truncate() / near_view.w;
        let far_view = far_view.truncate() / far_view.w;

        // Transform to world space
        let near_world = (inv_view * near_view.extend(1.0)).truncate();
        let far_world = (inv_view * far_view.extend(1.0)).truncate();

        Ray::new(near_world, far_world - near_world)
    }

    /// Project a world point to screen coordinates.
    ///
    /// Returns `None` for points at or behind the eye plane.
    pub fn project_point(
        &self,
        point: Vec3,
        screen_width: f32,
        screen_height: f32,
    ) -> Option<Vec2> {
        let clip = self.projection_matrix() * self.view_matrix() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }

        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * screen_width,
            (1.0 - ndc.y) * 0.5 * screen_height,
        ))
    }
}
