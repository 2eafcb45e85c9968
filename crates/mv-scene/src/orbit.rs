//! Orbit controller: the default camera manipulation, gated by an enable
//! flag so it stays mutually exclusive with part manipulation.

use crate::camera::Camera;

/// Routes viewport drags to the orbit camera while enabled.
///
/// The gesture machine disables the controller for the lifetime of a part
/// grab and re-enables it on release, so a drag can never both move a part
/// and orbit the camera.
#[derive(Debug, Clone)]
pub struct OrbitController {
    enabled: bool,
    orbit_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl OrbitController {
    /// Creates an enabled controller with default sensitivities.
    pub fn new() -> Self {
        Self {
            enabled: true,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.01,
        }
    }

    /// Whether camera input is currently routed to the camera.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables camera manipulation.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::trace!(enabled, "orbit controller toggled");
        }
        self.enabled = enabled;
    }

    /// Orbits the camera by a screen-space drag delta.
    pub fn orbit(&self, camera: &mut Camera, delta_x: f32, delta_y: f32) {
        if !self.enabled {
            return;
        }
        camera.orbit(
            -delta_x * self.orbit_sensitivity,
            delta_y * self.orbit_sensitivity,
        );
    }

    /// Pans the camera by a screen-space drag delta.
    pub fn pan(&self, camera: &mut Camera, delta_x: f32, delta_y: f32) {
        if !self.enabled {
            return;
        }
        camera.pan(delta_x, delta_y);
    }

    /// Zooms the camera by a scroll delta.
    pub fn zoom(&self, camera: &mut Camera, delta: f32) {
        if !self.enabled {
            return;
        }
        camera.zoom(delta * self.zoom_sensitivity);
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}
