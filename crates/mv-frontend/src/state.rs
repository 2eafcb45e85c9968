//! Shared application state

use std::sync::Arc;

use parking_lot::Mutex;

use mv_core::PartRegistry;
use mv_scene::{Camera, GestureMachine, OrbitController, SceneNode, sync_parts};

use crate::model;

/// Everything the viewer mutates at runtime.
///
/// All mutation happens on the UI thread; the shared handle only exists
/// because eframe's creation/update split wants one.
pub struct AppState {
    /// Part transforms, current and original.
    pub registry: PartRegistry,
    /// Scene graph root.
    pub scene: SceneNode,
    /// Orbit camera, doubling as the screen-to-ray projector.
    pub camera: Camera,
    /// Enable/disable gate in front of camera manipulation.
    pub orbit: OrbitController,
    /// The gesture state machine.
    pub gestures: GestureMachine,
}

impl AppState {
    /// Builds the model and wires up the interaction state.
    pub fn new() -> Self {
        let (registry, scene) = model::build_model();
        Self {
            registry,
            scene,
            camera: Camera::new(1.0),
            orbit: OrbitController::new(),
            gestures: GestureMachine::new(),
        }
    }

    /// Restores every part to its original placement.
    pub fn reset_parts(&mut self) {
        if let Err(err) = self
            .gestures
            .reset_all_parts(&mut self.registry, &mut self.orbit)
        {
            tracing::warn!(%err, "reset failed");
            return;
        }
        sync_parts(&self.registry, &mut self.scene);
        tracing::info!("parts reset to original placement");
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to the application state.
pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create a new shared app state.
pub fn create_shared_state() -> SharedAppState {
    Arc::new(Mutex::new(AppState::new()))
}
