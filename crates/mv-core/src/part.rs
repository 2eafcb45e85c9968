//! Part identity and transforms

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four independently manipulable parts of the product model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartName {
    Blade,
    Frame,
    Handguard,
    Handle,
}

impl PartName {
    /// All part names in assembly order
    pub const ALL: [PartName; 4] = [
        PartName::Blade,
        PartName::Frame,
        PartName::Handguard,
        PartName::Handle,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            PartName::Blade => "blade",
            PartName::Frame => "frame",
            PartName::Handguard => "handguard",
            PartName::Handle => "handle",
        }
    }
}

impl std::fmt::Display for PartName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Position and yaw of a part
///
/// Yaw is the rotation about the world up axis (+Y), in radians. The model
/// sits on the ground plane, so a single yaw scalar is the only rotation a
/// gesture can apply.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartTransform {
    pub position: Vec3,
    pub yaw: f32,
}

impl PartTransform {
    /// Create a transform at the given position with no rotation
    pub fn new(position: Vec3) -> Self {
        Self { position, yaw: 0.0 }
    }

    /// Get the world matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.yaw), self.position)
    }
}

/// A logical part: its current transform plus the scene node that owns its
/// renderable sub-tree
#[derive(Debug, Clone)]
pub struct Part {
    pub name: PartName,
    pub transform: PartTransform,
    /// Root scene node owned by this part
    pub node_id: Uuid,
}

impl Part {
    /// Create a part backed by the given scene node
    pub fn new(name: PartName, node_id: Uuid) -> Self {
        Self {
            name,
            transform: PartTransform::default(),
            node_id,
        }
    }

    /// Create a part with an explicit starting transform
    pub fn with_transform(name: PartName, node_id: Uuid, transform: PartTransform) -> Self {
        Self {
            name,
            transform,
            node_id,
        }
    }
}
