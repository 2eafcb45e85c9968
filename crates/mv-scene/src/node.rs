//! Hierarchical scene graph with interactable capability tags.

use glam::Mat4;
use uuid::Uuid;

use mv_core::{PartName, PartRegistry, PartTransform};

use crate::bounds::BoundingBox;

/// A renderable node in the scene tree.
///
/// A node carrying `interactable = Some(part)` is the ownership root of
/// that part's sub-tree: picking resolves any struck descendant up to it.
/// Nodes without an interactable ancestor are scenery and never pickable.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Stable node identity.
    pub id: Uuid,
    /// Human-readable tag, for logs and debugging only.
    pub name: String,
    /// Transform relative to the parent node.
    pub local: Mat4,
    /// Local-space bounds of this node's own geometry, if any.
    pub bounds: Option<BoundingBox>,
    /// Capability tag: the part whose sub-tree this node roots.
    pub interactable: Option<PartName>,
    /// Child nodes, in stable traversal order.
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates an empty group node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            local: Mat4::IDENTITY,
            bounds: None,
            interactable: None,
            children: Vec::new(),
        }
    }

    /// Creates a leaf node with geometry bounds.
    pub fn mesh(name: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::group(name)
        }
    }

    /// Marks this node as the ownership root for a part.
    pub fn with_interactable(mut self, part: PartName) -> Self {
        self.interactable = Some(part);
        self
    }

    /// Sets the local transform.
    pub fn with_local(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    /// Appends a child and returns its id.
    pub fn add_child(&mut self, child: SceneNode) -> Uuid {
        let id = child.id;
        self.children.push(child);
        id
    }

    /// Finds a node by id, depth first.
    pub fn find(&self, id: Uuid) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Finds a mutable node by id, depth first.
    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Finds the ownership root for a part.
    pub fn find_part_root(&self, part: PartName) -> Option<&SceneNode> {
        if self.interactable == Some(part) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_part_root(part))
    }

    /// Writes a part transform into its ownership root's local matrix.
    ///
    /// Returns false when no node is tagged for the part.
    pub fn set_part_transform(&mut self, part: PartName, transform: &PartTransform) -> bool {
        if self.interactable == Some(part) {
            self.local = transform.matrix();
            return true;
        }
        self.children
            .iter_mut()
            .any(|c| c.set_part_transform(part, transform))
    }

    /// Visits every node depth first, in stable traversal order.
    ///
    /// The callback receives the node, its accumulated world transform and
    /// the part owning it (the nearest interactable ancestor, or the node
    /// itself when tagged).
    pub fn walk(&self, f: &mut impl FnMut(&SceneNode, Mat4, Option<PartName>)) {
        self.walk_inner(Mat4::IDENTITY, None, f);
    }

    fn walk_inner(
        &self,
        parent_world: Mat4,
        parent_owner: Option<PartName>,
        f: &mut impl FnMut(&SceneNode, Mat4, Option<PartName>),
    ) {
        let world = parent_world * self.local;
        let owner = self.interactable.or(parent_owner);
        f(self, world, owner);
        for child in &self.children {
            child.walk_inner(world, owner, f);
        }
    }

    /// World-space bounds of this node's sub-tree.
    pub fn world_bounds(&self) -> BoundingBox {
        let mut total = BoundingBox::empty();
        self.walk(&mut |node, world, _| {
            if let Some(bounds) = node.bounds {
                total = total.union(&bounds.transform(&world));
            }
        });
        total
    }
}

/// Re-syncs every part's scene node from the registry's current transforms.
///
/// The gesture machine mutates registry transforms only; callers sync the
/// scene once per frame before picking or drawing.
pub fn sync_parts(registry: &PartRegistry, root: &mut SceneNode) {
    for part in registry.iter() {
        if !root.set_part_transform(part.name, &part.transform) {
            tracing::warn!(part = %part.name, "no scene node tagged for part");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use mv_core::Part;

    fn part_node(part: PartName, center: Vec3) -> SceneNode {
        let mut root = SceneNode::group(part.display_name()).with_interactable(part);
        root.add_child(SceneNode::mesh(
            "mesh",
            BoundingBox::from_center_half_extents(center, Vec3::splat(0.05)),
        ));
        root
    }

    #[test]
    fn test_find_descends_into_children() {
        let mut root = SceneNode::group("root");
        let child_id = root.add_child(part_node(PartName::Blade, Vec3::ZERO));
        assert!(root.find(child_id).is_some());
        assert!(root.find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_walk_accumulates_world_transform() {
        let mut root = SceneNode::group("root")
            .with_local(Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let mut child = SceneNode::group("child")
            .with_local(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));
        let leaf_id = child.add_child(
            SceneNode::mesh(
                "leaf",
                BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.1)),
            )
            .with_local(Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0))),
        );
        root.add_child(child);

        let mut leaf_world = None;
        root.walk(&mut |node, world, _| {
            if node.id == leaf_id {
                leaf_world = Some(world.transform_point3(Vec3::ZERO));
            }
        });
        assert_eq!(leaf_world, Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_walk_propagates_owner_to_descendants() {
        let mut root = SceneNode::group("root");
        root.add_child(part_node(PartName::Frame, Vec3::ZERO));
        root.add_child(SceneNode::mesh(
            "scenery",
            BoundingBox::from_center_half_extents(Vec3::ZERO, Vec3::ONE),
        ));

        let mut owners = Vec::new();
        root.walk(&mut |node, _, owner| {
            if node.bounds.is_some() {
                owners.push((node.name.clone(), owner));
            }
        });
        assert_eq!(
            owners,
            vec![
                ("mesh".to_string(), Some(PartName::Frame)),
                ("scenery".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_set_part_transform_updates_tagged_root() {
        let mut root = SceneNode::group("root");
        root.add_child(part_node(PartName::Handle, Vec3::ZERO));

        let transform = PartTransform::new(Vec3::new(0.2, 0.0, -0.1));
        assert!(root.set_part_transform(PartName::Handle, &transform));
        let node = root.find_part_root(PartName::Handle).unwrap();
        assert_eq!(
            node.local.transform_point3(Vec3::ZERO),
            Vec3::new(0.2, 0.0, -0.1)
        );

        assert!(!root.set_part_transform(PartName::Blade, &transform));
    }

    #[test]
    fn test_sync_parts_writes_registry_transforms() {
        let mut root = SceneNode::group("root");
        let node_id = root.add_child(part_node(PartName::Blade, Vec3::ZERO));

        let mut registry = PartRegistry::new();
        let mut part = Part::new(PartName::Blade, node_id);
        part.transform.position = Vec3::new(0.0, 0.0, 0.5);
        registry.insert(part);

        sync_parts(&registry, &mut root);
        let node = root.find_part_root(PartName::Blade).unwrap();
        assert_eq!(
            node.local.transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 0.0, 0.5)
        );
    }
}
