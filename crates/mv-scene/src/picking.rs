//! Touch-to-part hit testing.

use glam::Vec2;

use mv_core::PartName;

use crate::camera::Camera;
use crate::node::SceneNode;
use crate::ray::Ray;

/// Resolves a screen point to the topmost interactable part under it.
///
/// Pure query against current scene state; returns `None` when nothing
/// interactable lies under the point.
pub fn pick(
    screen: Vec2,
    viewport: Vec2,
    camera: &Camera,
    root: &SceneNode,
) -> Option<PartName> {
    let ray = camera.screen_to_ray(screen.x, screen.y, viewport.x, viewport.y);
    pick_with_ray(&ray, root)
}

/// Resolves a world ray to the part it strikes first.
///
/// Only nodes under an interactable-tagged ancestor are tested; each hit is
/// resolved upward to the node carrying the capability tag. The nearest
/// intersection distance wins, and equal distances break by scene traversal
/// order so results are deterministic.
pub fn pick_with_ray(ray: &Ray, root: &SceneNode) -> Option<PartName> {
    let mut best: Option<(f32, usize, PartName)> = None;
    let mut order = 0usize;

    root.walk(&mut |node, world, owner| {
        order += 1;
        let Some(owner) = owner else {
            // Untagged scenery is never pickable
            return;
        };
        let Some(bounds) = node.bounds else {
            return;
        };

        if let Some(t) = bounds.transform(&world).intersect_ray(ray) {
            let better = match best {
                None => true,
                Some((best_t, best_order, _)) => {
                    t < best_t || (t == best_t && order < best_order)
                }
            };
            if better {
                best = Some((t, order, owner));
            }
        }
    });

    best.map(|(t, _, part)| {
        tracing::trace!(%part, distance = t, "pick hit");
        part
    })
}
