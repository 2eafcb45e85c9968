//! Ray math for picking and drag-plane projection.

use glam::Vec3;

/// A world-space ray.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin of the ray.
    pub origin: Vec3,
    /// Direction of the ray (normalized).
    pub dir: Vec3,
}

impl Ray {
    /// Creates a ray from an origin and a direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize(),
        }
    }

    /// Returns the point at parameter `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Ray-plane intersection.
    ///
    /// Returns `None` when the ray is near-parallel to the plane or the
    /// intersection lies behind the origin, so callers never see an
    /// infinite or NaN point.
    pub fn intersect_plane(&self, plane_point: Vec3, plane_normal: Vec3) -> Option<Vec3> {
        let denom = self.dir.dot(plane_normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (plane_point - self.origin).dot(plane_normal) / denom;
        if t < 0.0 {
            return None;
        }

        Some(self.point_at(t))
    }
}

/// The horizontal reference plane used to project 2D touch motion into 3D
/// translation during a drag.
///
/// Fixed for the session; the normal is always the world up axis (+Y).
#[derive(Debug, Clone, Copy)]
pub struct DragPlane {
    /// Height of the plane along the up axis.
    pub height: f32,
}

impl DragPlane {
    /// Creates a drag plane at the given height.
    pub fn new(height: f32) -> Self {
        Self { height }
    }

    /// Intersects a ray with the plane.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        ray.intersect_plane(Vec3::new(0.0, self.height, 0.0), Vec3::Y)
    }
}

impl Default for DragPlane {
    fn default() -> Self {
        Self::new(mv_core::DRAG_PLANE_HEIGHT)
    }
}
