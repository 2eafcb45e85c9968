//! Viewport panel: input routing and wireframe drawing
//!
//! Translates egui pointer/touch input into the touch event model, feeds
//! the gesture machine, routes leftover drags to the orbit controller and
//! paints the projected scene with egui's painter.

use std::collections::BTreeMap;

use glam::Vec2;

use mv_core::PartName;
use mv_scene::{TouchEvent, TouchPoint, sync_parts};

use crate::state::AppState;

/// Part wireframe colors, in registry order.
fn part_color(part: PartName) -> egui::Color32 {
    match part {
        PartName::Blade => egui::Color32::from_rgb(190, 190, 210),
        PartName::Frame => egui::Color32::from_rgb(90, 160, 90),
        PartName::Handguard => egui::Color32::from_rgb(200, 140, 60),
        PartName::Handle => egui::Color32::from_rgb(80, 130, 200),
    }
}

/// Highlight color for the selected part.
const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 210, 80);

/// Tracks active contacts by platform touch id and emits whole-gesture
/// touch events, mirroring the platform's ordered contact list.
#[derive(Default)]
pub struct TouchTracker {
    active: BTreeMap<u64, Vec2>,
}

impl TouchTracker {
    /// Folds one platform touch notification into the contact set and
    /// returns the resulting event.
    pub fn on_touch(&mut self, id: u64, phase: egui::TouchPhase, position: Vec2) -> TouchEvent {
        match phase {
            egui::TouchPhase::Start => {
                self.active.insert(id, position);
                TouchEvent::start(self.points())
            }
            egui::TouchPhase::Move => {
                self.active.insert(id, position);
                TouchEvent::moved(self.points())
            }
            egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                self.active.remove(&id);
                TouchEvent::end(self.points())
            }
        }
    }

    /// Whether any contact is currently down.
    pub fn has_contacts(&self) -> bool {
        !self.active.is_empty()
    }

    fn points(&self) -> Vec<TouchPoint> {
        self.active
            .values()
            .map(|p| TouchPoint::new(*p))
            .collect()
    }
}

/// The 3D viewport panel.
#[derive(Default)]
pub struct ViewportPanel {
    tracker: TouchTracker,
    pointer_down: bool,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        let available_size = ui.available_size();
        let (response, painter) =
            ui.allocate_painter(available_size, egui::Sense::click_and_drag());
        let rect = response.rect;

        // Resize: keep the projector's aspect in sync every frame
        if rect.height() > 0.0 {
            state.camera.update_aspect(rect.width() / rect.height());
        }
        let viewport = Vec2::new(rect.width(), rect.height());
        state.gestures.set_viewport(viewport);

        self.handle_input(ui, &response, state);

        sync_parts(&state.registry, &mut state.scene);
        self.draw(&painter, rect, state);
    }

    fn handle_input(&mut self, ui: &mut egui::Ui, response: &egui::Response, state: &mut AppState) {
        let rect = response.rect;
        let to_local = |pos: egui::Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);

        // Focus loss mid-gesture must fail safe
        let lost_focus = ui.input(|i| {
            i.events
                .iter()
                .any(|e| matches!(e, egui::Event::WindowFocused(false)))
        });
        if lost_focus {
            state
                .gestures
                .interrupt(&mut state.orbit);
            self.tracker = TouchTracker::default();
            self.pointer_down = false;
        }

        // Real touch events take priority over the pointer fallback
        let touch_events: Vec<TouchEvent> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Touch {
                        id, phase, pos, ..
                    } => Some(self.tracker.on_touch(id.0, *phase, to_local(*pos))),
                    _ => None,
                })
                .collect()
        });

        let mut events = touch_events;
        if events.is_empty() && !self.tracker.has_contacts() {
            events.extend(self.pointer_events(response, to_local));
        }

        for event in &events {
            state.gestures.handle_event(
                event,
                &state.camera,
                &state.scene,
                &mut state.registry,
                &mut state.orbit,
            );
        }

        // Camera input goes through the orbit gate, so it is ignored for
        // the lifetime of a part grab
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            if ui.input(|i| i.modifiers.shift) {
                state.orbit.pan(&mut state.camera, delta.x, delta.y);
            } else {
                state.orbit.orbit(&mut state.camera, delta.x, delta.y);
            }
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                state.orbit.zoom(&mut state.camera, scroll);
            }
        }
    }

    /// Desktop fallback: a primary-button drag acts as one contact point.
    fn pointer_events(
        &mut self,
        response: &egui::Response,
        to_local: impl Fn(egui::Pos2) -> Vec2,
    ) -> Vec<TouchEvent> {
        let mut events = Vec::new();
        let pos = response
            .interact_pointer_pos()
            .or(response.hover_pos())
            .map(&to_local);

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = pos {
                self.pointer_down = true;
                events.push(TouchEvent::start(vec![TouchPoint::new(pos)]));
            }
        } else if self.pointer_down && response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = pos {
                events.push(TouchEvent::moved(vec![TouchPoint::new(pos)]));
            }
        } else if self.pointer_down && response.drag_stopped_by(egui::PointerButton::Primary) {
            self.pointer_down = false;
            events.push(TouchEvent::end(Vec::new()));
        }
        events
    }

    fn draw(&self, painter: &egui::Painter, rect: egui::Rect, state: &AppState) {
        painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(24, 24, 28));

        let viewport = Vec2::new(rect.width(), rect.height());
        let to_screen = |p: Vec2| egui::pos2(rect.min.x + p.x, rect.min.y + p.y);

        // Ground grid on the drag plane
        let grid_stroke = egui::Stroke::new(1.0, egui::Color32::from_gray(50));
        let half = 0.3;
        let step = 0.05;
        let mut line = -half;
        while line <= half + step * 0.5 {
            self.draw_world_line(
                painter,
                state,
                viewport,
                to_screen,
                glam::Vec3::new(line, 0.0, -half),
                glam::Vec3::new(line, 0.0, half),
                grid_stroke,
            );
            self.draw_world_line(
                painter,
                state,
                viewport,
                to_screen,
                glam::Vec3::new(-half, 0.0, line),
                glam::Vec3::new(half, 0.0, line),
                grid_stroke,
            );
            line += step;
        }

        // Part wireframes
        for part in state.registry.iter() {
            let Some(node) = state.scene.find_part_root(part.name) else {
                continue;
            };
            let bounds = node.world_bounds();
            if !bounds.is_valid() {
                continue;
            }

            let color = if state.gestures.selected() == Some(part.name) {
                SELECTED_COLOR
            } else {
                part_color(part.name)
            };
            let stroke = egui::Stroke::new(1.5, color);

            let (min, max) = (bounds.min, bounds.max);
            let corners = [
                glam::Vec3::new(min.x, min.y, min.z),
                glam::Vec3::new(max.x, min.y, min.z),
                glam::Vec3::new(min.x, max.y, min.z),
                glam::Vec3::new(max.x, max.y, min.z),
                glam::Vec3::new(min.x, min.y, max.z),
                glam::Vec3::new(max.x, min.y, max.z),
                glam::Vec3::new(min.x, max.y, max.z),
                glam::Vec3::new(max.x, max.y, max.z),
            ];
            const EDGES: [(usize, usize); 12] = [
                (0, 1),
                (0, 2),
                (1, 3),
                (2, 3),
                (4, 5),
                (4, 6),
                (5, 7),
                (6, 7),
                (0, 4),
                (1, 5),
                (2, 6),
                (3, 7),
            ];
            for (a, b) in EDGES {
                self.draw_world_line(
                    painter, state, viewport, to_screen, corners[a], corners[b], stroke,
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_world_line(
        &self,
        painter: &egui::Painter,
        state: &AppState,
        viewport: Vec2,
        to_screen: impl Fn(Vec2) -> egui::Pos2,
        a: glam::Vec3,
        b: glam::Vec3,
        stroke: egui::Stroke,
    ) {
        let (Some(a), Some(b)) = (
            state.camera.project_point(a, viewport.x, viewport.y),
            state.camera.project_point(b, viewport.x, viewport.y),
        ) else {
            return;
        };
        painter.line_segment([to_screen(a), to_screen(b)], stroke);
    }
}
