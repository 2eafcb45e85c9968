//! Model assembly and layout
//!
//! Builds the four-part assembly, normalizes it to its real-world overall
//! length, centers it at the origin and snapshots the original transforms.
//! Placeholder boxes stand in for the production mesh assets; the layout
//! and normalization path is the same one real meshes would take.

use glam::Vec3;

use mv_core::{Part, PartName, PartRegistry, PartTransform, REAL_WORLD_LENGTH};
use mv_scene::{BoundingBox, SceneNode};

/// Part layout in model units, before normalization: (name, center,
/// half-extents). Z is the length axis of the assembly.
fn raw_parts() -> [(PartName, Vec3, Vec3); 4] {
    [
        (
            PartName::Frame,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.9, 0.12, 2.5),
        ),
        (
            PartName::Blade,
            Vec3::new(0.0, 0.16, 0.6),
            Vec3::new(0.7, 0.04, 0.5),
        ),
        (
            PartName::Handguard,
            Vec3::new(0.0, 0.5, -0.9),
            Vec3::new(0.55, 0.25, 0.7),
        ),
        (
            PartName::Handle,
            Vec3::new(0.0, 0.1, 3.4),
            Vec3::new(0.45, 0.18, 0.9),
        ),
    ]
}

/// Builds the scene graph and registry for the assembled model.
///
/// Ordering matters: scale to [`REAL_WORLD_LENGTH`], center, then snapshot
/// originals, so reset restores the normalized layout.
pub fn build_model() -> (PartRegistry, SceneNode) {
    let raw = raw_parts();

    let mut assembly = BoundingBox::empty();
    for (_, center, half) in &raw {
        assembly = assembly.union(&BoundingBox::from_center_half_extents(*center, *half));
    }
    let scale = REAL_WORLD_LENGTH / assembly.size().z;
    let offset = assembly.center() * scale;

    let mut scene = SceneNode::group("model");
    let mut registry = PartRegistry::new();

    for (name, center, half) in raw {
        let transform = PartTransform::new(center * scale - offset);
        let mut part_root = SceneNode::group(name.display_name())
            .with_interactable(name)
            .with_local(transform.matrix());
        part_root.add_child(SceneNode::mesh(
            "body",
            BoundingBox::from_center_half_extents(Vec3::ZERO, half * scale),
        ));
        let node_id = scene.add_child(part_root);

        registry.insert(Part::with_transform(name, node_id, transform));
    }

    if let Err(err) = registry.snapshot_originals() {
        tracing::error!(%err, "failed to snapshot original transforms");
    }
    tracing::info!(parts = registry.len(), "model assembled");

    (registry, scene)
}
