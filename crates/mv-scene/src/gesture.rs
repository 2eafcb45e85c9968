//! Gesture state machine for part manipulation.
//!
//! Consumes raw touch events and drives picking, drag-plane projection and
//! part transforms. While a part is grabbed the orbit controller is
//! disabled, so camera orbit and part manipulation stay mutually exclusive.

use glam::{Vec2, Vec3};

use mv_core::{DRAG_SENSITIVITY, PartName, PartRegistry, RegistryError};

use crate::camera::Camera;
use crate::node::SceneNode;
use crate::orbit::OrbitController;
use crate::picking;
use crate::ray::DragPlane;
use crate::touch::{TouchEvent, TouchPhase, TouchPoint};

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// No part is grabbed; the orbit controller owns input.
    #[default]
    Idle,
    /// Single-touch translation of the selected part.
    Dragging,
    /// Two-touch rotation of the selected part.
    Rotating,
}

/// How single-touch motion maps to part translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPolicy {
    /// Absolute drag-plane projection. The part follows the finger exactly,
    /// preserving the grab offset so there is no snap at grab time.
    PlaneAnchor,
    /// Incremental scaled screen deltas: screen X maps to world X, screen Y
    /// to world Z, scaled by `sensitivity` world units per pixel.
    ScreenDelta {
        /// World units of translation per pixel of screen motion.
        sensitivity: f32,
    },
}

impl DragPolicy {
    /// The screen-delta policy at the default sensitivity.
    pub fn screen_delta() -> Self {
        DragPolicy::ScreenDelta {
            sensitivity: DRAG_SENSITIVITY,
        }
    }
}

impl Default for DragPolicy {
    fn default() -> Self {
        DragPolicy::PlaneAnchor
    }
}

/// Transient interaction state, owned by the machine and reset on release.
#[derive(Debug, Default)]
struct GestureState {
    mode: GestureMode,
    selected: Option<PartName>,
    last_touch: Vec2,
    /// Offset between the drag-plane grab point and the part position,
    /// subtracted on every move so the part does not snap to the finger.
    grab_offset: Vec3,
}

/// The gesture state machine.
pub struct GestureMachine {
    state: GestureState,
    policy: DragPolicy,
    plane: DragPlane,
    viewport: Vec2,
}

impl GestureMachine {
    /// Creates a machine with the default (plane-anchor) drag policy.
    pub fn new() -> Self {
        Self::with_policy(DragPolicy::default())
    }

    /// Creates a machine with an explicit drag policy.
    pub fn with_policy(policy: DragPolicy) -> Self {
        Self {
            state: GestureState::default(),
            policy,
            plane: DragPlane::default(),
            viewport: Vec2::new(1.0, 1.0),
        }
    }

    /// Updates the viewport size used for screen-to-ray conversion.
    pub fn set_viewport(&mut self, size: Vec2) {
        self.viewport = size.max(Vec2::ONE);
    }

    /// Current interaction mode.
    pub fn mode(&self) -> GestureMode {
        self.state.mode
    }

    /// Currently selected part, if any.
    pub fn selected(&self) -> Option<PartName> {
        self.state.selected
    }

    /// The active drag policy.
    pub fn policy(&self) -> DragPolicy {
        self.policy
    }

    /// Feeds one touch event through the machine.
    ///
    /// Events must arrive in platform delivery order; each call runs to
    /// completion before the next.
    pub fn handle_event(
        &mut self,
        event: &TouchEvent,
        camera: &Camera,
        scene: &SceneNode,
        registry: &mut PartRegistry,
        orbit: &mut OrbitController,
    ) {
        match event.phase {
            TouchPhase::Start => self.on_start(&event.touches, camera, scene, registry, orbit),
            TouchPhase::Move => self.on_move(&event.touches, camera, registry),
            TouchPhase::End => self.on_end(&event.touches, orbit),
        }
    }

    fn on_start(
        &mut self,
        touches: &[TouchPoint],
        camera: &Camera,
        scene: &SceneNode,
        registry: &mut PartRegistry,
        orbit: &mut OrbitController,
    ) {
        // Multi-finger starts never initiate a selection; a second finger
        // landing mid-drag keeps the current grab.
        if touches.len() != 1 {
            return;
        }

        let point = touches[0].position;
        self.state.last_touch = point;

        let Some(part) = picking::pick(point, self.viewport, camera, scene) else {
            // No hit: stay idle, orbit remains available
            return;
        };
        let Some(grabbed) = registry.get(part) else {
            tracing::warn!(%part, "picked part missing from registry");
            return;
        };

        let ray = camera.screen_to_ray(point.x, point.y, self.viewport.x, self.viewport.y);
        // A near-horizontal look angle can miss the plane at grab time; a
        // zero offset keeps the grab alive and moves skip until the plane
        // is reachable again.
        let grab_offset = self
            .plane
            .intersect(&ray)
            .map(|hit| hit - grabbed.transform.position)
            .unwrap_or(Vec3::ZERO);

        self.state = GestureState {
            mode: GestureMode::Dragging,
            selected: Some(part),
            last_touch: point,
            grab_offset,
        };
        orbit.set_enabled(false);
        tracing::debug!(%part, "part grabbed");
    }

    fn on_move(&mut self, touches: &[TouchPoint], camera: &Camera, registry: &mut PartRegistry) {
        if self.state.mode == GestureMode::Idle {
            return;
        }
        let Some(name) = self.state.selected else {
            return;
        };
        // Selection invalidated externally: drop it rather than act on a
        // stale reference
        if registry.get(name).is_none() {
            tracing::debug!(part = %name, "selected part vanished, dropping gesture");
            self.state.selected = None;
            return;
        }

        match touches.len() {
            1 => {
                let point = touches[0].position;
                if self.state.mode == GestureMode::Rotating {
                    // Back to one finger: re-anchor so the part does not
                    // jump to where the remaining finger sits
                    self.reanchor(point, camera, registry, name);
                    self.state.mode = GestureMode::Dragging;
                }
                self.apply_drag(point, camera, registry, name);
            }
            2.. => {
                let a = touches[0].position;
                let b = touches[1].position;
                let yaw = (b.y - a.y).atan2(b.x - a.x);
                if let Some(part) = registry.get_mut(name) {
                    part.transform.yaw = yaw;
                }
                self.state.mode = GestureMode::Rotating;
            }
            _ => {}
        }
    }

    fn apply_drag(
        &mut self,
        point: Vec2,
        camera: &Camera,
        registry: &mut PartRegistry,
        name: PartName,
    ) {
        match self.policy {
            DragPolicy::PlaneAnchor => {
                let ray =
                    camera.screen_to_ray(point.x, point.y, self.viewport.x, self.viewport.y);
                // Degenerate (near-parallel) intersection: skip this frame
                let Some(hit) = self.plane.intersect(&ray) else {
                    self.state.last_touch = point;
                    return;
                };
                if let Some(part) = registry.get_mut(name) {
                    part.transform.position = hit - self.state.grab_offset;
                }
            }
            DragPolicy::ScreenDelta { sensitivity } => {
                let delta = (point - self.state.last_touch) * sensitivity;
                if let Some(part) = registry.get_mut(name) {
                    part.transform.position.x += delta.x;
                    part.transform.position.z += delta.y;
                }
            }
        }
        self.state.last_touch = point;
    }

    /// Recomputes the grab offset against the part's current position.
    ///
    /// Needed after any event that moved the finger or the part outside the
    /// machine's control (rotation, external reset).
    fn reanchor(
        &mut self,
        point: Vec2,
        camera: &Camera,
        registry: &PartRegistry,
        name: PartName,
    ) {
        let Some(part) = registry.get(name) else {
            return;
        };
        let ray = camera.screen_to_ray(point.x, point.y, self.viewport.x, self.viewport.y);
        if let Some(hit) = self.plane.intersect(&ray) {
            self.state.grab_offset = hit - part.transform.position;
        }
        self.state.last_touch = point;
    }

    fn on_end(&mut self, touches: &[TouchPoint], orbit: &mut OrbitController) {
        // Contacts remain: the tracked gesture continues
        if !touches.is_empty() {
            return;
        }
        if let Some(part) = self.state.selected {
            tracing::debug!(%part, "part released");
        }
        // Always return to idle and hand the camera back, even when the
        // selection was already cleared
        self.state = GestureState::default();
        orbit.set_enabled(true);
    }

    /// Fail-safe for focus loss or visibility change mid-gesture.
    ///
    /// Unconditionally returns to `Idle` and re-enables the orbit
    /// controller so the camera can never get stuck disabled.
    pub fn interrupt(&mut self, orbit: &mut OrbitController) {
        if self.state.mode != GestureMode::Idle {
            tracing::debug!("gesture interrupted");
        }
        self.state = GestureState::default();
        orbit.set_enabled(true);
    }

    /// Restores every part to its original transform.
    ///
    /// Callable at any time; invoked mid-gesture it first forces the
    /// machine back to `Idle` so no stale anchor offset survives the reset.
    pub fn reset_all_parts(
        &mut self,
        registry: &mut PartRegistry,
        orbit: &mut OrbitController,
    ) -> Result<(), RegistryError> {
        if self.state.mode != GestureMode::Idle {
            self.interrupt(orbit);
        }
        registry.reset_all_parts()
    }
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Mat4;
    use mv_core::Part;

    use crate::bounds::BoundingBox;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    struct Fixture {
        camera: Camera,
        scene: SceneNode,
        registry: PartRegistry,
        orbit: OrbitController,
        machine: GestureMachine,
    }

    impl Fixture {
        fn new(policy: DragPolicy) -> Self {
            let mut scene = SceneNode::group("scene");
            let mut registry = PartRegistry::new();

            // Four parts spread along X on the ground plane
            for (i, name) in PartName::ALL.into_iter().enumerate() {
                let position = Vec3::new(i as f32 * 0.2 - 0.3, 0.0, 0.0);
                let mut part_root = SceneNode::group(name.display_name())
                    .with_interactable(name)
                    .with_local(Mat4::from_translation(position));
                part_root.add_child(SceneNode::mesh(
                    "mesh",
                    BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.05)),
                ));
                let node_id = scene.add_child(part_root);

                let mut part = Part::new(name, node_id);
                part.transform.position = position;
                registry.insert(part);
            }
            registry.snapshot_originals().unwrap();

            let mut machine = GestureMachine::with_policy(policy);
            machine.set_viewport(VIEWPORT);

            Self {
                camera: Camera::new(VIEWPORT.x / VIEWPORT.y),
                scene,
                registry,
                orbit: OrbitController::new(),
                machine,
            }
        }

        fn screen_pos_of(&self, name: PartName) -> Vec2 {
            let position = self.registry.get(name).unwrap().transform.position;
            self.camera
                .project_point(position, VIEWPORT.x, VIEWPORT.y)
                .unwrap()
        }

        fn send(&mut self, event: TouchEvent) {
            self.machine.handle_event(
                &event,
                &self.camera,
                &self.scene,
                &mut self.registry,
                &mut self.orbit,
            );
        }

        fn grab(&mut self, name: PartName) -> Vec2 {
            let screen = self.screen_pos_of(name);
            self.send(TouchEvent::start(vec![TouchPoint::new(screen)]));
            screen
        }
    }

    #[test]
    fn test_touch_on_part_enters_dragging_and_disables_orbit() {
        let mut fx = Fixture::new(DragPolicy::default());
        fx.grab(PartName::Frame);

        assert_eq!(fx.machine.mode(), GestureMode::Dragging);
        assert_eq!(fx.machine.selected(), Some(PartName::Frame));
        assert!(!fx.orbit.enabled());
    }

    #[test]
    fn test_touch_on_empty_space_stays_idle() {
        let mut fx = Fixture::new(DragPolicy::default());
        fx.send(TouchEvent::start(vec![TouchPoint::new(Vec2::new(2.0, 2.0))]));

        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        assert_eq!(fx.machine.selected(), None);
        assert!(fx.orbit.enabled());
    }

    #[test]
    fn test_two_finger_start_never_selects() {
        let mut fx = Fixture::new(DragPolicy::default());
        let screen = fx.screen_pos_of(PartName::Frame);
        fx.send(TouchEvent::start(vec![
            TouchPoint::new(screen),
            TouchPoint::new(screen + Vec2::new(30.0, 0.0)),
        ]));

        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        assert_eq!(fx.machine.selected(), None);
    }

    #[test]
    fn test_screen_delta_drag_moves_part_by_scaled_delta() {
        let mut fx = Fixture::new(DragPolicy::screen_delta());
        let start = fx.registry.get(PartName::Frame).unwrap().transform.position;
        let screen = fx.grab(PartName::Frame);

        // 50 px to the right at 0.002 world units per px
        fx.send(TouchEvent::moved(vec![TouchPoint::new(
            screen + Vec2::new(50.0, 0.0),
        )]));

        let position = fx.registry.get(PartName::Frame).unwrap().transform.position;
        assert_relative_eq!(position.x - start.x, 0.1, epsilon = 1e-6);
        assert_relative_eq!(position.z - start.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_screen_y_maps_to_world_z() {
        let mut fx = Fixture::new(DragPolicy::screen_delta());
        let start = fx.registry.get(PartName::Blade).unwrap().transform.position;
        let screen = fx.grab(PartName::Blade);

        fx.send(TouchEvent::moved(vec![TouchPoint::new(
            screen + Vec2::new(0.0, 25.0),
        )]));

        let position = fx.registry.get(PartName::Blade).unwrap().transform.position;
        assert_relative_eq!(position.z - start.z, 0.05, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_net_delta_returns_part_to_start() {
        for policy in [DragPolicy::PlaneAnchor, DragPolicy::screen_delta()] {
            let mut fx = Fixture::new(policy);
            let start = fx.registry.get(PartName::Handle).unwrap().transform.position;
            let screen = fx.grab(PartName::Handle);

            fx.send(TouchEvent::moved(vec![TouchPoint::new(
                screen + Vec2::new(40.0, -25.0),
            )]));
            fx.send(TouchEvent::moved(vec![TouchPoint::new(screen)]));

            let position = fx.registry.get(PartName::Handle).unwrap().transform.position;
            assert!(
                (position - start).length() < 1e-4,
                "round trip drifted under {policy:?}: {position} vs {start}"
            );
        }
    }

    #[test]
    fn test_plane_anchor_drag_does_not_snap_at_grab() {
        let mut fx = Fixture::new(DragPolicy::PlaneAnchor);
        let start = fx.registry.get(PartName::Handguard).unwrap().transform.position;
        let screen = fx.grab(PartName::Handguard);

        // Moving to the exact grab point must leave the part in place
        fx.send(TouchEvent::moved(vec![TouchPoint::new(screen)]));
        let position = fx.registry.get(PartName::Handguard).unwrap().transform.position;
        assert!((position - start).length() < 1e-4);
    }

    #[test]
    fn test_second_finger_rotates_without_dropping_selection() {
        let mut fx = Fixture::new(DragPolicy::default());
        let screen = fx.grab(PartName::Frame);

        fx.send(TouchEvent::moved(vec![
            TouchPoint::new(Vec2::new(100.0, 100.0)),
            TouchPoint::new(Vec2::new(140.0, 140.0)),
        ]));

        assert_eq!(fx.machine.mode(), GestureMode::Rotating);
        assert_eq!(fx.machine.selected(), Some(PartName::Frame));
        let yaw = fx.registry.get(PartName::Frame).unwrap().transform.yaw;
        assert_relative_eq!(yaw, 40.0_f32.atan2(40.0), epsilon = 1e-6);
        assert_relative_eq!(yaw, 0.785, epsilon = 1e-3);

        // One finger lifting returns to dragging, selection intact
        fx.send(TouchEvent::moved(vec![TouchPoint::new(screen)]));
        assert_eq!(fx.machine.mode(), GestureMode::Dragging);
        assert_eq!(fx.machine.selected(), Some(PartName::Frame));
    }

    #[test]
    fn test_rotation_is_absolute_not_incremental() {
        let mut fx = Fixture::new(DragPolicy::default());
        fx.grab(PartName::Frame);

        let contacts = |a: Vec2, b: Vec2| {
            TouchEvent::moved(vec![TouchPoint::new(a), TouchPoint::new(b)])
        };
        fx.send(contacts(Vec2::new(100.0, 100.0), Vec2::new(140.0, 140.0)));
        fx.send(contacts(Vec2::new(100.0, 100.0), Vec2::new(140.0, 100.0)));

        // Horizontal contacts pin yaw to zero regardless of history
        let yaw = fx.registry.get(PartName::Frame).unwrap().transform.yaw;
        assert_relative_eq!(yaw, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_two_finger_move_without_selection_is_noop() {
        let mut fx = Fixture::new(DragPolicy::default());
        fx.send(TouchEvent::moved(vec![
            TouchPoint::new(Vec2::new(100.0, 100.0)),
            TouchPoint::new(Vec2::new(140.0, 140.0)),
        ]));

        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        for name in PartName::ALL {
            assert_relative_eq!(fx.registry.get(name).unwrap().transform.yaw, 0.0);
        }
    }

    #[test]
    fn test_release_returns_to_idle_and_reenables_orbit() {
        let mut fx = Fixture::new(DragPolicy::default());
        fx.grab(PartName::Blade);
        assert!(!fx.orbit.enabled());

        fx.send(TouchEvent::end(vec![]));
        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        assert_eq!(fx.machine.selected(), None);
        assert!(fx.orbit.enabled());
    }

    #[test]
    fn test_release_with_remaining_contact_keeps_gesture() {
        let mut fx = Fixture::new(DragPolicy::default());
        let screen = fx.grab(PartName::Blade);

        fx.send(TouchEvent::end(vec![TouchPoint::new(screen)]));
        assert_eq!(fx.machine.mode(), GestureMode::Dragging);
        assert!(!fx.orbit.enabled());
    }

    #[test]
    fn test_release_after_external_clear_still_restores_orbit() {
        let mut fx = Fixture::new(DragPolicy::default());
        let screen = fx.grab(PartName::Blade);

        // Registry teardown while the gesture is live
        fx.registry.clear();
        fx.send(TouchEvent::moved(vec![TouchPoint::new(
            screen + Vec2::new(10.0, 0.0),
        )]));
        assert_eq!(fx.machine.selected(), None);

        fx.send(TouchEvent::end(vec![]));
        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        assert!(fx.orbit.enabled());
    }

    #[test]
    fn test_stale_selection_move_is_noop() {
        let mut fx = Fixture::new(DragPolicy::screen_delta());
        let screen = fx.grab(PartName::Handle);

        fx.registry.clear();
        // Must not panic or resurrect the part
        fx.send(TouchEvent::moved(vec![TouchPoint::new(
            screen + Vec2::new(50.0, 50.0),
        )]));
        assert_eq!(fx.machine.selected(), None);
        assert!(fx.registry.is_empty());
    }

    #[test]
    fn test_reset_mid_gesture_forces_idle_and_restores_transforms() {
        let mut fx = Fixture::new(DragPolicy::screen_delta());
        let originals: Vec<_> = fx
            .registry
            .iter()
            .map(|p| (p.name, p.transform))
            .collect();

        let screen = fx.grab(PartName::Frame);
        fx.send(TouchEvent::moved(vec![TouchPoint::new(
            screen + Vec2::new(120.0, 80.0),
        )]));

        fx.machine
            .reset_all_parts(&mut fx.registry, &mut fx.orbit)
            .unwrap();

        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        assert_eq!(fx.machine.selected(), None);
        assert!(fx.orbit.enabled());
        for (name, transform) in originals {
            assert_eq!(fx.registry.get(name).unwrap().transform, transform);
        }
    }

    #[test]
    fn test_interrupt_always_restores_idle_and_orbit() {
        let mut fx = Fixture::new(DragPolicy::default());
        fx.grab(PartName::Handguard);
        assert!(!fx.orbit.enabled());

        fx.machine.interrupt(&mut fx.orbit);
        assert_eq!(fx.machine.mode(), GestureMode::Idle);
        assert_eq!(fx.machine.selected(), None);
        assert!(fx.orbit.enabled());

        // Idempotent when already idle
        fx.machine.interrupt(&mut fx.orbit);
        assert!(fx.orbit.enabled());
    }

    #[test]
    fn test_degenerate_plane_intersection_skips_update() {
        let mut fx = Fixture::new(DragPolicy::PlaneAnchor);
        // Flatten the camera so rays run parallel to the ground plane
        fx.camera.target.y = 0.0;
        fx.camera.orbit(0.0, -fx.camera.pitch);
        assert_relative_eq!(fx.camera.pitch, 0.0);

        let screen = fx.grab(PartName::Frame);
        assert_eq!(fx.machine.mode(), GestureMode::Dragging);
        let start = fx.registry.get(PartName::Frame).unwrap().transform.position;

        fx.send(TouchEvent::moved(vec![TouchPoint::new(
            screen + Vec2::new(60.0, 0.0),
        )]));
        let position = fx.registry.get(PartName::Frame).unwrap().transform.position;
        assert_eq!(position, start);
        assert!(position.is_finite());
    }
}
